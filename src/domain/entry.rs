use super::error::EntryError;
use super::field::{
    CLASS, CODE_FILE, CODE_FUNC, CODE_LINE, ERRNO, FieldName, MESSAGE, MESSAGE_ID, PRIORITY,
    TRACE,
};
use super::location::{CallerLocation, ErrorContext, StackFrame};
use super::message_id;
use super::priority::Priority;
use crate::sender::encoding;
use bytes::Bytes;
use rand::TryRngCore;
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::slice;

/// One structured journal record.
///
/// Fields keep their insertion order, which is also the order on the wire.
/// `MESSAGE_ID` is always the first field and is generated on construction.
/// Once set, a field can never be overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    fields: Vec<(FieldName, Bytes)>,
    names: HashSet<FieldName>,
    message_id: String,
}

impl JournalEntry {
    /// An entry holding only its `MESSAGE_ID`.
    pub fn new() -> Result<Self, EntryError> {
        Self::with_message_id(message_id::generate()?)
    }

    /// Like [`JournalEntry::new`] but draws the `MESSAGE_ID` from `rng`.
    pub fn new_with_rng<R>(rng: &mut R) -> Result<Self, EntryError>
    where
        R: TryRngCore + ?Sized,
    {
        Self::with_message_id(message_id::generate_with(rng)?)
    }

    fn with_message_id(id: String) -> Result<Self, EntryError> {
        let mut entry = Self {
            fields: Vec::with_capacity(8),
            names: HashSet::with_capacity(8),
            message_id: String::new(),
        };
        entry.add_value(MESSAGE_ID, &id)?;
        entry.message_id = id;
        Ok(entry)
    }

    /// Seeds `MESSAGE`, `CODE_FILE`, `CODE_LINE` and `CODE_FUNC`.
    ///
    /// Use [`journal_entry!`](crate::journal_entry) to fill `location` from
    /// the call site.
    pub fn from_message(
        message: impl AsRef<[u8]>,
        location: &CallerLocation,
    ) -> Result<Self, EntryError> {
        let mut entry = Self::new()?;
        entry.add_value(MESSAGE, message)?;
        entry.add_location(location)?;
        Ok(entry)
    }

    /// Seeds the same fields as [`JournalEntry::from_message`], taking the
    /// location from a captured trace (see [`CallerLocation::from_frames`]).
    pub fn from_message_at(
        message: impl AsRef<[u8]>,
        frames: &[StackFrame],
        offset: usize,
    ) -> Result<Self, EntryError> {
        let location = CallerLocation::from_frames(frames, offset)?;
        Self::from_message(message, &location)
    }

    /// Seeds `MESSAGE`, `CODE_FILE`, `CODE_LINE`, `CODE_FUNC`, `ERRNO`,
    /// `CLASS` and `TRACE` from a caught error.
    pub fn from_error(context: &ErrorContext) -> Result<Self, EntryError> {
        let mut entry = Self::new()?;
        entry.add_value(MESSAGE, &context.message)?;
        entry.add_location(&context.location)?;
        entry.add_value(ERRNO, context.code.to_string())?;
        entry.add_value(CLASS, &context.class)?;
        entry.add_value(TRACE, &context.trace)?;
        Ok(entry)
    }

    fn add_location(&mut self, location: &CallerLocation) -> Result<(), EntryError> {
        self.add_value(CODE_FILE, location.code_file())?;
        self.add_value(CODE_LINE, location.code_line().to_string())?;
        self.add_value(CODE_FUNC, location.code_func())
    }

    /// Appends a field. `name` is uppercased before validation.
    ///
    /// The entry is left untouched when this fails.
    pub fn add_value(&mut self, name: &str, value: impl AsRef<[u8]>) -> Result<(), EntryError> {
        let name = FieldName::parse(name)?;

        if self.names.contains(&name) {
            return Err(EntryError::DuplicateField {
                name: name.as_str().to_string(),
            });
        }

        self.names.insert(name.clone());
        self.fields
            .push((name, Bytes::copy_from_slice(value.as_ref())));
        Ok(())
    }

    pub fn add_priority(&mut self, priority: Priority) -> Result<(), EntryError> {
        self.add_value(PRIORITY, priority.as_str())
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Value of `name` (matched case-insensitively).
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        let name = name.to_ascii_uppercase();
        self.fields
            .iter()
            .find(|(field, _)| field.as_str() == name)
            .map(|(_, value)| value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.to_ascii_uppercase().as_str())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields in insertion order. Each call starts from the beginning.
    pub fn fields(&self) -> Fields<'_> {
        Fields {
            inner: self.fields.iter(),
        }
    }

    /// Renders the native protocol payload.
    pub fn serialize(&self) -> Bytes {
        encoding::encode_fields(self.fields())
    }

    /// Size of [`JournalEntry::serialize`]'s output without building it.
    pub fn encoded_len(&self) -> usize {
        encoding::encoded_len(self.fields())
    }
}

impl<'a> IntoIterator for &'a JournalEntry {
    type Item = (&'a str, &'a [u8]);
    type IntoIter = Fields<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields()
    }
}

/// Iterator over the `(name, value)` pairs of a [`JournalEntry`].
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    inner: slice::Iter<'a, (FieldName, Bytes)>,
}

impl<'a> Iterator for Fields<'a> {
    type Item = (&'a str, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Fields<'_> {}

impl FusedIterator for Fields<'_> {}
