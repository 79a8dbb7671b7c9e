use serde::Deserialize;

/// A movie ready to be inserted; `id` is assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewMovie {
    pub user_id: i32,
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
}

impl NewMovie {
    pub fn basic(user_id: i32, title: &str) -> Self {
        Self { user_id, title: title.to_string(), ..Default::default() }
    }
}

/// Raw, untrimmed field edits as submitted by the user.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieChanges {
    #[serde(rename = "new_title")]
    pub title: Option<String>,
    #[serde(rename = "new_year")]
    pub year: Option<String>,
    #[serde(rename = "new_director")]
    pub director: Option<String>,
}

impl MovieChanges {
    pub fn is_blank(&self) -> bool {
        [&self.title, &self.year, &self.director]
            .into_iter()
            .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// One-shot feedback shown on the page a POST redirects to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Notice {
    UserCreated,
    UserNameMissing,
    UserExists,
    UserDeleted,
    MovieAdded,
    MovieAddedWithoutLookup,
    MovieAddedLookupUnavailable,
    MovieAddedNotFound,
    MovieTitleMissing,
    MovieDuplicate,
    MovieUpdated,
    NothingToUpdate,
    MovieDeleted,
}

impl Notice {
    const ALL: [Notice; 13] = [
        Notice::UserCreated,
        Notice::UserNameMissing,
        Notice::UserExists,
        Notice::UserDeleted,
        Notice::MovieAdded,
        Notice::MovieAddedWithoutLookup,
        Notice::MovieAddedLookupUnavailable,
        Notice::MovieAddedNotFound,
        Notice::MovieTitleMissing,
        Notice::MovieDuplicate,
        Notice::MovieUpdated,
        Notice::NothingToUpdate,
        Notice::MovieDeleted,
    ];

    pub fn as_code(self) -> &'static str {
        match self {
            Notice::UserCreated => "user_created",
            Notice::UserNameMissing => "user_name_missing",
            Notice::UserExists => "user_exists",
            Notice::UserDeleted => "user_deleted",
            Notice::MovieAdded => "movie_added",
            Notice::MovieAddedWithoutLookup => "movie_added_without_lookup",
            Notice::MovieAddedLookupUnavailable => "movie_added_lookup_unavailable",
            Notice::MovieAddedNotFound => "movie_added_not_found",
            Notice::MovieTitleMissing => "movie_title_missing",
            Notice::MovieDuplicate => "movie_duplicate",
            Notice::MovieUpdated => "movie_updated",
            Notice::NothingToUpdate => "nothing_to_update",
            Notice::MovieDeleted => "movie_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.as_code() == code)
    }

    pub fn level(self) -> NoticeLevel {
        match self {
            Notice::UserCreated | Notice::MovieAdded | Notice::MovieUpdated => NoticeLevel::Success,
            Notice::UserDeleted | Notice::MovieAddedWithoutLookup | Notice::MovieDeleted => {
                NoticeLevel::Info
            },
            Notice::UserNameMissing
            | Notice::UserExists
            | Notice::MovieAddedLookupUnavailable
            | Notice::MovieAddedNotFound
            | Notice::MovieTitleMissing
            | Notice::MovieDuplicate
            | Notice::NothingToUpdate => NoticeLevel::Warning,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::UserCreated => "User created successfully!",
            Notice::UserNameMissing => "Please enter a name.",
            Notice::UserExists => "A user with that name already exists.",
            Notice::UserDeleted => "User deleted.",
            Notice::MovieAdded => "Movie added successfully!",
            Notice::MovieAddedWithoutLookup => {
                "Movie added using your title only. (No movie database configured.)"
            },
            Notice::MovieAddedLookupUnavailable => {
                "We couldn't reach the movie database right now, but we added your movie using the title you provided."
            },
            Notice::MovieAddedNotFound => {
                "We couldn't find this movie in the database, but we added it using your title only."
            },
            Notice::MovieTitleMissing => "Please enter a movie title.",
            Notice::MovieDuplicate => "This movie is already in your library.",
            Notice::MovieUpdated => "Movie updated successfully.",
            Notice::NothingToUpdate => "No changes provided to update.",
            Notice::MovieDeleted => "Movie deleted.",
        }
    }
}
