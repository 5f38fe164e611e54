//! Session state for the terminal

use super::identity::Identity;

/// Who is currently using the terminal
///
/// The terminal borrows the identity for as long as the session lasts;
/// whoever created the identity keeps ownership of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Session<'a> {
    #[default]
    LoggedOut,
    LoggedIn(&'a Identity),
}

impl<'a> Session<'a> {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }

    pub fn identity(&self) -> Option<&'a Identity> {
        match self {
            Session::LoggedIn(identity) => Some(identity),
            Session::LoggedOut => None,
        }
    }
}
