//! Transient notifications printed after an action

use std::fmt;

use roomloop_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    /// Destructive toast carrying the error's message
    pub fn failure(title: impl Into<String>, error: &Error) -> Self {
        tracing::debug!(%error, "Action failed");
        Self::error(title, error.to_string())
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.variant {
            ToastVariant::Default => '*',
            ToastVariant::Destructive => '!',
        };
        if self.description.is_empty() {
            write!(f, "{} {}", marker, self.title)
        } else {
            write!(f, "{} {}: {}", marker, self.title, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let toast = Toast::success("Joined room", "You've joined \"Doodles\".");
        assert_eq!(toast.to_string(), "* Joined room: You've joined \"Doodles\".");

        let toast = Toast::failure("Error", &Error::RoomFull);
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert_eq!(toast.to_string(), "! Error: This room is full");

        assert_eq!(Toast::success("Rooms refreshed", "").to_string(), "* Rooms refreshed");
    }
}
