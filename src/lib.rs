//! A small conditional template formatter.
//!
//! Renders human facing text, like chat notification messages, from a
//! template written by an end user and a set of named values and flags
//! supplied by the application.
//!
//! # Syntax
//!
//! - Values: `%[user]%`
//! - Conversions: `%[user!j]%` (JSON escape), `%[user!u]%` (uppercase),
//!   `%[user!l]%` (lowercase), applied left to right, e.g. `%[user!jl]%`
//! - Conditions: `%[% ping %|% yes %|% no %]%`, negated with
//!   `%[% !ping %|% no %]%`
//! - Escaping: `%%` renders a single `%`
//!
//! Identifiers are case insensitive. Every value is also a condition that
//! holds when the value is not empty.
//!
//! A condition branch that starts with a newline is dedented, so that
//! authors can write it on indented lines below the condition tag. Add `!r`
//! to the condition to keep the branch as written, e.g. `%[% ping!r %|% ... %]%`.
//!
//! # Getting started
//!
//! The quickest way to render a template is the [`format`] function.
//!
//! ```
//! let bindings = condfmt::bindings! { user: "Alice", ping: true };
//! let result = condfmt::format("%[%ping%|%Hey %]%%[USER]%!", &bindings)?;
//! assert_eq!(result, "Hey Alice!");
//! # Ok::<(), condfmt::Error>(())
//! ```
//!
//! For more control, construct an [`Engine`]. The engine stores the
//! configuration and a cache of parsed templates. Generally, you only need to
//! construct one engine during the lifetime of a program.
//!
//! ```
//! use condfmt::{Bindings, Engine};
//!
//! let mut engine = Engine::new();
//! engine.set_max_recursion_depth(4);
//!
//! let template = engine.compile("Welcome to %[category!u]%")?;
//! let result = template.render(&Bindings::new().with("category", "general"))?;
//! assert_eq!(result, "Welcome to GENERAL");
//! # Ok::<(), condfmt::Error>(())
//! ```
//!
//! # Recursive values
//!
//! A value can itself be a template, for example a per server default message
//! that may be overridden. Mark the name using
//! [`Bindings::with_recursive`] to render the value before substituting it.
//!
//! ```
//! use condfmt::Bindings;
//!
//! let bindings = Bindings::new()
//!     .with("user", "Alice")
//!     .with("default", "Hello %[user]%")
//!     .with_recursive("default");
//!
//! let result = condfmt::format("%[default]%, enjoy your stay.", &bindings)?;
//! assert_eq!(result, "Hello Alice, enjoy your stay.");
//! # Ok::<(), condfmt::Error>(())
//! ```

mod bindings;
mod compile;
mod convert;
mod error;
mod escape;
mod macros;
mod render;
mod types;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use crate::bindings::{Binding, Bindings, Tables};
pub use crate::convert::{json_escape, Conversion};
pub use crate::error::{Error, ErrorKind};
pub use crate::escape::{escape, Escaper};

use crate::types::ast;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The default maximum recursion depth.
const DEFAULT_MAX_RECURSION_DEPTH: usize = 16;

/// The default maximum number of cached templates.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// The compilation and rendering engine.
///
/// The engine is [`Send`] and [`Sync`] and caches parsed templates by their
/// source, so a single engine can be shared between threads.
pub struct Engine {
    max_recursion_depth: usize,
    cache_capacity: usize,
    cache: RwLock<BTreeMap<String, Arc<ast::Template>>>,
}

/// A compiled template.
#[derive(Clone)]
pub struct Template<'engine> {
    engine: &'engine Engine,
    template: Arc<ast::Template>,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    /// Set the maximum number of nested expansions of recursive values.
    ///
    /// Defaults to 16.
    #[inline]
    pub fn set_max_recursion_depth(&mut self, depth: usize) {
        self.max_recursion_depth = depth;
    }

    /// Set the maximum number of parsed templates kept in the cache.
    ///
    /// When the cache is full it is cleared before the next template is
    /// added. Setting this to zero disables the cache. Defaults to 256.
    pub fn set_cache_capacity(&mut self, capacity: usize) {
        self.cache_capacity = capacity;
        let cache = self.cache.get_mut().unwrap_or_else(PoisonError::into_inner);
        if cache.len() > capacity {
            cache.clear();
        }
    }

    /// Compile a template.
    ///
    /// If the same source was compiled before the cached tree is reused.
    #[inline]
    pub fn compile(&self, source: &str) -> Result<Template<'_>> {
        let template = self.compile_cached(source)?;
        Ok(Template {
            engine: self,
            template,
        })
    }

    /// Compile and render a template in one step.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = condfmt::Engine::new();
    /// let bindings = condfmt::bindings! { channel: "general" };
    /// let result = engine.format("Created %[channel]%.", &bindings)?;
    /// assert_eq!(result, "Created general.");
    /// # Ok::<(), condfmt::Error>(())
    /// ```
    pub fn format(&self, source: &str, bindings: &Bindings) -> Result<String> {
        self.compile(source)?.render(bindings)
    }

    /// Remove all cached templates.
    pub fn clear_cache(&self) {
        self.write_cache().clear();
    }

    /// Returns the number of cached templates.
    pub fn cached(&self) -> usize {
        self.read_cache().len()
    }

    pub(crate) fn compile_cached(&self, source: &str) -> Result<Arc<ast::Template>> {
        if let Some(template) = self.read_cache().get(source) {
            log::trace!("template cache hit ({} bytes)", source.len());
            return Ok(Arc::clone(template));
        }

        log::trace!("template cache miss ({} bytes)", source.len());
        let template = Arc::new(compile::template(source)?);

        if self.cache_capacity > 0 {
            let mut cache = self.write_cache();
            if cache.len() >= self.cache_capacity && !cache.contains_key(source) {
                log::debug!("template cache full ({} entries), clearing", cache.len());
                cache.clear();
            }
            cache.insert(source.to_owned(), Arc::clone(&template));
        }

        Ok(template)
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<ast::Template>>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<ast::Template>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("max_recursion_depth", &self.max_recursion_depth)
            .field("cache_capacity", &self.cache_capacity)
            .field("cached", &self.cached())
            .finish()
    }
}

impl<'engine> Template<'engine> {
    /// Render the template to a string using the provided bindings.
    #[inline]
    pub fn render(&self, bindings: &Bindings) -> Result<String> {
        self.evaluate(&bindings.resolve())
    }

    /// Render the template to a string using already resolved tables.
    ///
    /// This is useful to render many templates with the same bindings.
    #[inline]
    pub fn evaluate(&self, tables: &Tables) -> Result<String> {
        render::template(self.engine, &self.template, tables)
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.template.source
    }
}

impl fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("engine", &self.engine)
            .field("source", &self.source())
            .finish_non_exhaustive()
    }
}

/// Render a template using a shared default engine.
///
/// Parsed templates are cached so rendering the same template again is
/// cheap.
///
/// ```
/// let result = condfmt::format("100%%", &condfmt::Bindings::new())?;
/// assert_eq!(result, "100%");
/// # Ok::<(), condfmt::Error>(())
/// ```
pub fn format(source: &str, bindings: &Bindings) -> Result<String> {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(Engine::new).format(source, bindings)
}
