use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{movie, user},
    models::{Notice, NoticeLevel},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(users: &[user::Model], notice: Option<Notice>) -> String {
    page(
        "MoviWeb",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    h1 class="text-3xl font-bold text-gray-900" { "MoviWeb" }
                    p class="mt-2 text-gray-600" { "Everyone's favorite movies, in one place." }

                    (notice_banner(notice))

                    div class="mt-8 bg-white shadow rounded-lg p-6" {
                        h2 class="text-lg font-semibold text-gray-900" { "Users" }
                        @if users.is_empty() {
                            p class="mt-4 text-gray-500" { "No users yet." }
                        } @else {
                            ul class="mt-4 divide-y divide-gray-100" {
                                @for user in users {
                                    li class="flex items-center justify-between py-2" {
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/users/{}/movies", user.id)) {
                                            (user.name)
                                        }
                                        form method="post" action=(format!("/users/{}/delete", user.id)) {
                                            button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    form class="mt-8 bg-white shadow rounded-lg p-6 flex gap-3" method="post" action="/users" {
                        input class="flex-1 rounded-md border border-gray-300 px-3 py-2" name="name" placeholder="New user name" required;
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add user" }
                    }
                }
            }
        },
    )
}

pub fn movies_page(
    user: &user::Model,
    movies: &[movie::Model],
    search: &str,
    notice: Option<Notice>,
) -> String {
    let base = format!("/users/{}/movies", user.id);

    page(
        &format!("{}'s movies", user.name),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-3xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { (user.name) "'s favorite movies" }
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "All users" }
                    }

                    (notice_banner(notice))

                    form class="mt-8 flex gap-3" method="get" action=(base) {
                        input class="flex-1 rounded-md border border-gray-300 px-3 py-2" name="q" value=(search) placeholder="Search your movies";
                        button class="rounded-md border border-gray-300 px-4 py-2" type="submit" { "Search" }
                    }

                    form class="mt-4 flex gap-3" method="post" action=(base) {
                        input class="flex-1 rounded-md border border-gray-300 px-3 py-2" name="title" placeholder="Movie title" required;
                        button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Add movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            @if search.is_empty() {
                                p class="text-gray-600" { "No movies yet." }
                            } @else {
                                p class="text-gray-600" { "No movies match \"" (search) "\"." }
                            }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(&base, movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page(what: &str) -> String {
    page(
        "Not found",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "404" }
                        p class="mt-4 text-gray-700" { "Sorry, that " (what) " does not exist." }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn notice_banner(notice: Option<Notice>) -> Markup {
    let Some(notice) = notice else {
        return html! {};
    };
    let style = match notice.level() {
        NoticeLevel::Info => "border-blue-300 bg-blue-50 text-blue-800",
        NoticeLevel::Success => "border-green-300 bg-green-50 text-green-800",
        NoticeLevel::Warning => "border-yellow-300 bg-yellow-50 text-yellow-800",
    };

    html! {
        div class=(format!("mt-6 rounded-md border px-4 py-3 {style}")) data-notice=(notice.as_code()) {
            (notice.message())
        }
    }
}

fn movie_card(base: &str, movie: &movie::Model) -> Markup {
    let action = format!("{base}/{}", movie.id);

    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if let Some(poster) = &movie.poster_url {
                img class="w-20 rounded" src=(poster) alt=(movie.title);
            }
            div class="flex-1" {
                h2 class="text-xl font-semibold text-gray-900" {
                    (movie.title)
                    @if let Some(year) = movie.year {
                        span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                    }
                }
                @if let Some(director) = &movie.director {
                    p class="mt-1 text-sm text-gray-500" { "Directed by " (director) }
                }

                form class="mt-4 flex flex-wrap gap-2" method="post" action=(format!("{action}/update")) {
                    input class="rounded-md border border-gray-300 px-2 py-1 text-sm" name="new_title" placeholder="Title";
                    input class="w-24 rounded-md border border-gray-300 px-2 py-1 text-sm" name="new_year" placeholder="Year";
                    input class="rounded-md border border-gray-300 px-2 py-1 text-sm" name="new_director" placeholder="Director";
                    button class="rounded-md border border-gray-300 px-3 py-1 text-sm" type="submit" { "Update" }
                }
                form class="mt-2" method="post" action=(format!("{action}/delete")) {
                    button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                }
            }
        }
    }
}
