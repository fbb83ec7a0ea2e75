use console::style;
use std::fmt::Display;

/// White bold — section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim — hints, secondary text, source listings
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow — warnings, error messages in the transcript
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green — session titles, confirmed values
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold — prompt marker, list indices
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}
