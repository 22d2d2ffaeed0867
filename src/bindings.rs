//! Named values and flags supplied at render time.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use crate::{Error, Result};

/// A single named input: either a string value or a boolean flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A string that can be substituted with `%[name]%`. It also acts as a
    /// condition which holds when the string is not empty.
    Value(String),
    /// A boolean that can only be used as a condition.
    Flag(bool),
}

impl From<&str> for Binding {
    fn from(s: &str) -> Self {
        Self::Value(s.to_owned())
    }
}

impl From<&String> for Binding {
    fn from(s: &String) -> Self {
        Self::Value(s.clone())
    }
}

impl From<String> for Binding {
    fn from(s: String) -> Self {
        Self::Value(s)
    }
}

impl From<Cow<'_, str>> for Binding {
    fn from(s: Cow<'_, str>) -> Self {
        Self::Value(s.into_owned())
    }
}

impl From<bool> for Binding {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// The named inputs for rendering a template.
///
/// Names are case insensitive. The same name can be bound to both a value and
/// a flag, in which case the flag decides the condition and the value is
/// still available for substitution.
///
/// # Examples
///
/// ```
/// use condfmt::Bindings;
///
/// let bindings = Bindings::new()
///     .with("user", "<@1234>")
///     .with("ping", true)
///     .with("default", "Welcome %[USER]%!")
///     .with_recursive("default");
///
/// let result = condfmt::format("%[%ping%|%%[default]%%]%", &bindings)?;
/// assert_eq!(result, "Welcome <@1234>!");
/// # Ok::<(), condfmt::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
    flags: BTreeMap<String, bool>,
    recurse: BTreeSet<String>,
}

/// The lookup tables used when evaluating a template.
///
/// Constructed using [`Bindings::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    values: BTreeMap<String, String>,
    conditions: BTreeMap<String, bool>,
    recurse: BTreeSet<String>,
}

impl Bindings {
    /// Construct empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value or a flag to a name, replacing any previous binding of
    /// the same kind.
    pub fn insert(&mut self, name: &str, binding: impl Into<Binding>) -> &mut Self {
        let name = fold(name).into_owned();
        match binding.into() {
            Binding::Value(value) => {
                self.values.insert(name, value);
            }
            Binding::Flag(flag) => {
                self.flags.insert(name, flag);
            }
        }
        self
    }

    /// Bind a value or a flag to a name and return the bindings.
    pub fn with(mut self, name: &str, binding: impl Into<Binding>) -> Self {
        self.insert(name, binding);
        self
    }

    /// Mark a name so that its bound value is itself rendered as a template
    /// before being substituted.
    pub fn insert_recursive(&mut self, name: &str) -> &mut Self {
        self.recurse.insert(fold(name).into_owned());
        self
    }

    /// Mark a name as recursive and return the bindings.
    pub fn with_recursive(mut self, name: &str) -> Self {
        self.insert_recursive(name);
        self
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.flags.is_empty()
    }

    /// Builds the value and condition tables.
    ///
    /// Every value is a condition that holds when the value is not empty.
    /// Explicit flags always take precedence over this, regardless of the
    /// order in which they were inserted.
    pub fn resolve(&self) -> Tables {
        let mut conditions: BTreeMap<String, bool> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), !value.is_empty()))
            .collect();
        conditions.extend(self.flags.iter().map(|(name, flag)| (name.clone(), *flag)));
        Tables {
            values: self.values.clone(),
            conditions,
            recurse: self.recurse.clone(),
        }
    }

    /// Construct bindings from any serializable value.
    ///
    /// The value must serialize to a map. Strings become values, booleans
    /// become flags, numbers become values containing their decimal
    /// representation and `None` becomes an empty value. Nested lists and
    /// maps are not supported.
    ///
    /// # Examples
    ///
    /// ```
    /// #[derive(serde::Serialize)]
    /// struct Context {
    ///     user: String,
    ///     ping: bool,
    /// }
    ///
    /// let ctx = Context { user: "Alice".into(), ping: false };
    /// let bindings = condfmt::Bindings::from_serialize(&ctx)?;
    /// let result = condfmt::format("%[%ping%|%@%]%%[user]%", &bindings)?;
    /// assert_eq!(result, "Alice");
    /// # Ok::<(), condfmt::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_serialize<S>(ctx: S) -> Result<Self>
    where
        S: serde::Serialize,
    {
        use serde_json::Value;

        let map = match serde_json::to_value(ctx) {
            Ok(Value::Object(map)) => map,
            Ok(value) => {
                return Err(Error::serialize(format!(
                    "expected a map of bindings, found {}",
                    human(&value)
                )))
            }
            Err(err) => return Err(Error::serialize(err.to_string())),
        };

        let mut bindings = Self::new();
        for (name, value) in map {
            match value {
                Value::String(s) => bindings.insert(&name, s),
                Value::Bool(b) => bindings.insert(&name, b),
                Value::Number(n) => bindings.insert(&name, n.to_string()),
                Value::Null => bindings.insert(&name, ""),
                value => {
                    return Err(Error::serialize(format!(
                        "unsupported binding `{name}`, found {}",
                        human(&value)
                    )))
                }
            };
        }
        Ok(bindings)
    }
}

impl Tables {
    /// Returns the value bound to the name.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(fold(name).as_ref()).map(String::as_str)
    }

    /// Returns the condition for the name.
    pub fn condition(&self, name: &str) -> Option<bool> {
        self.conditions.get(fold(name).as_ref()).copied()
    }

    /// Returns true if the value bound to the name is rendered as a template.
    pub fn is_recursive(&self, name: &str) -> bool {
        self.recurse.contains(fold(name).as_ref())
    }
}

/// Case folds a name, only allocating when necessary.
fn fold(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(feature = "serde")]
fn human(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "none",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
