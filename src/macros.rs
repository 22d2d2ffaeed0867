/// Convenient macro for constructing [`Bindings`][crate::Bindings].
///
/// Keys are identifiers and values are any expression that converts into a
/// [`Binding`][crate::Binding], i.e. strings and booleans.
///
/// # Examples
///
/// ```
/// let bindings = condfmt::bindings! {
///     user: "<@1234>",
///     channel: String::from("general"),
///     ping: true,
/// };
/// let tables = bindings.resolve();
/// assert_eq!(tables.value("channel"), Some("general"));
/// assert_eq!(tables.condition("ping"), Some(true));
/// ```
#[macro_export]
macro_rules! bindings {
    () => {
        $crate::Bindings::new()
    };

    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut bindings = $crate::Bindings::new();
        $(
            bindings.insert(stringify!($key), $value);
        )+
        bindings
    }};
}
