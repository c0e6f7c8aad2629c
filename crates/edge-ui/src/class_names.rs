//! Conditional class name joining.

use std::borrow::Cow;

/// A value that may contribute a class name.
///
/// Falsy values (`false`, `""`, `None`) contribute nothing.
pub trait ClassValue {
    /// The class name, or `None` if the value is falsy.
    fn class(&self) -> Option<Cow<'_, str>>;
}

impl ClassValue for str {
    fn class(&self) -> Option<Cow<'_, str>> {
        (!self.is_empty()).then_some(Cow::Borrowed(self))
    }
}

impl ClassValue for String {
    fn class(&self) -> Option<Cow<'_, str>> {
        self.as_str().class()
    }
}

impl ClassValue for bool {
    fn class(&self) -> Option<Cow<'_, str>> {
        self.then_some(Cow::Borrowed("true"))
    }
}

impl<T: ClassValue> ClassValue for Option<T> {
    fn class(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(ClassValue::class)
    }
}

/// `(class, condition)`: the class when the condition holds.
impl<T: ClassValue> ClassValue for (T, bool) {
    fn class(&self) -> Option<Cow<'_, str>> {
        if self.1 {
            self.0.class()
        } else {
            None
        }
    }
}

impl<T: ClassValue + ?Sized> ClassValue for &T {
    fn class(&self) -> Option<Cow<'_, str>> {
        (**self).class()
    }
}

/// Join the truthy values with a single space.
pub fn class_names(classes: &[&dyn ClassValue]) -> String {
    classes
        .iter()
        .filter_map(|value| value.class())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join class names, skipping falsy values.
///
/// ```
/// use edge_ui::class_names;
///
/// let active = true;
/// assert_eq!(class_names!("a", false, "", "b"), "a b");
/// assert_eq!(class_names!("tab", ("tab-active", active), None::<&str>), "tab tab-active");
/// ```
#[macro_export]
macro_rules! class_names {
    () => {
        ::std::string::String::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::class_names(&[$(&$value as &dyn $crate::ClassValue),+])
    };
}
