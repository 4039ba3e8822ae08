//! Device capability seams (image library, date picker).
//!
//! The store never talks to these. The catalog asks them for a value and
//! passes the result into a store operation as plain data.

use chrono::{DateTime, Utc};

use gearlog_core::DomainResult;

/// Access to the device image library.
pub trait ImagePicker {
    /// Ask the user for an image.
    ///
    /// `Ok(None)` means the user cancelled. A refused library permission is
    /// reported as [`gearlog_core::DomainError::PermissionDenied`].
    fn pick_image(&self) -> DomainResult<Option<String>>;
}

/// Access to the device date picker.
pub trait DatePicker {
    /// Ask the user for a date, starting from `current`. `None` when dismissed.
    fn pick_date(&self, current: DateTime<Utc>) -> Option<DateTime<Utc>>;
}
