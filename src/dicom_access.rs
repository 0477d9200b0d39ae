use std::collections::BTreeMap;

use dicom::core::Tag;
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{DefaultDicomObject, InMemDicomObject};

use crate::normalize;

/// Typed view over attributes of different DICOM object shapes.
///
/// Implementors only expose raw text; the provided methods apply the
/// normalization rules so call sites never coerce values by hand.
pub trait ElementAccess {
    fn element_str(&self, tag: Tag) -> Option<String>;
    fn has_element(&self, tag: Tag) -> bool;

    fn text(&self, tag: Tag) -> String {
        normalize::text(self.element_str(tag).as_deref())
    }

    fn int(&self, tag: Tag, default: i64) -> i64 {
        normalize::int(self.element_str(tag).as_deref(), default)
    }

    fn float(&self, tag: Tag, default: f64) -> f64 {
        normalize::float(self.element_str(tag).as_deref(), default)
    }

    fn first_float(&self, tag: Tag) -> Option<f64> {
        normalize::first_float(self.element_str(tag).as_deref())
    }
}

impl ElementAccess for DefaultDicomObject {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.into_owned())
    }

    fn has_element(&self, tag: Tag) -> bool {
        self.element(tag).is_ok()
    }
}

impl ElementAccess for InMemDicomObject<StandardDataDictionary> {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.into_owned())
    }

    fn has_element(&self, tag: Tag) -> bool {
        self.element(tag).is_ok()
    }
}

/// Attribute text detached from the decoded object, so records can be built
/// after the file handle is gone (and from synthetic input in tests).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    values: BTreeMap<Tag, String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the listed tags out of any accessible object, skipping absent ones.
    pub fn capture<T: ElementAccess>(obj: &T, tags: &[Tag]) -> Self {
        let values = tags
            .iter()
            .filter_map(|&tag| obj.element_str(tag).map(|v| (tag, v)))
            .collect();
        Self { values }
    }

    pub fn with(mut self, tag: Tag, value: impl Into<String>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn insert(&mut self, tag: Tag, value: impl Into<String>) {
        self.values.insert(tag, value.into());
    }
}

impl ElementAccess for AttributeSet {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.values.get(&tag).cloned()
    }

    fn has_element(&self, tag: Tag) -> bool {
        self.values.contains_key(&tag)
    }
}
