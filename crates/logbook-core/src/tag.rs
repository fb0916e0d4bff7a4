//! Categorization tags.
//!
//! A log call may carry any number of tags. Each tag is built from a value by
//! picking its best textual representation, in this order:
//!
//! 1. an explicit string, used verbatim
//! 2. a description (`Display` output)
//! 3. the name of a type
//!
//! Callers state which representation they want through the [`Tag`]
//! constructors; [`Tag::best`] applies the precedence chain when several are
//! available at once.

use std::fmt;

/// A resolved categorization label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Explicit text, used verbatim.
    Text(String),
    /// Description of a value.
    Described(String),
    /// Display name of a type.
    TypeName(String),
}

impl Tag {
    /// Tag from explicit text.
    pub fn text(text: impl Into<String>) -> Self {
        Tag::Text(text.into())
    }

    /// Tag from a value's `Display` output.
    pub fn described(value: &impl fmt::Display) -> Self {
        Tag::Described(value.to_string())
    }

    /// Tag naming the type `T`, without its module path.
    pub fn of_type<T: ?Sized>() -> Self {
        Tag::TypeName(short_type_name(std::any::type_name::<T>()))
    }

    /// Tag naming the runtime type of `value`.
    ///
    /// Fallback for values that are neither text nor describable.
    pub fn of_value<T: ?Sized>(_value: &T) -> Self {
        Self::of_type::<T>()
    }

    /// Pick the best representation available.
    ///
    /// Explicit text wins over a description, which wins over the type name.
    pub fn best(text: Option<String>, description: Option<String>, type_name: &str) -> Self {
        match (text, description) {
            (Some(text), _) => Tag::Text(text),
            (None, Some(description)) => Tag::Described(description),
            (None, None) => Tag::TypeName(short_type_name(type_name)),
        }
    }

    /// The tag's text.
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Text(s) | Tag::Described(s) | Tag::TypeName(s) => s,
        }
    }

    /// Consume the tag and return its text.
    pub fn into_string(self) -> String {
        match self {
            Tag::Text(s) | Tag::Described(s) | Tag::TypeName(s) => s,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Tag {
    fn from(text: &str) -> Self {
        Tag::Text(text.to_string())
    }
}

impl From<String> for Tag {
    fn from(text: String) -> Self {
        Tag::Text(text)
    }
}

impl From<&String> for Tag {
    fn from(text: &String) -> Self {
        Tag::Text(text.clone())
    }
}

/// Values accepted where a log call takes tags.
///
/// `None` means "no tag" and is dropped.
pub trait IntoTag {
    fn into_tag(self) -> Option<Tag>;
}

impl IntoTag for Tag {
    fn into_tag(self) -> Option<Tag> {
        Some(self)
    }
}

impl IntoTag for &Tag {
    fn into_tag(self) -> Option<Tag> {
        Some(self.clone())
    }
}

impl IntoTag for &str {
    fn into_tag(self) -> Option<Tag> {
        Some(Tag::from(self))
    }
}

impl IntoTag for String {
    fn into_tag(self) -> Option<Tag> {
        Some(Tag::from(self))
    }
}

impl IntoTag for &String {
    fn into_tag(self) -> Option<Tag> {
        Some(Tag::from(self))
    }
}

impl<T: IntoTag> IntoTag for Option<T> {
    fn into_tag(self) -> Option<Tag> {
        self.and_then(IntoTag::into_tag)
    }
}

/// Resolve a sequence of optional tags, dropping the absent ones.
///
/// Order is preserved exactly; nothing is deduplicated or sorted.
pub fn resolve_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: IntoTag,
{
    tags.into_iter()
        .filter_map(IntoTag::into_tag)
        .map(Tag::into_string)
        .collect()
}

/// Strip module paths from a `std::any::type_name` string.
///
/// `alloc::vec::Vec<my_app::net::Peer>` becomes `Vec<Peer>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*') {
            out.push_str(last_segment(&full[segment_start..i]));
            out.push(c);
            segment_start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&full[segment_start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
