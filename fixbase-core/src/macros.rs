//! Fixbase macros

/// value creation macro
#[macro_export]
macro_rules! value {
    ($val:expr) => {{
        $crate::Value::from($val)
    }};
}

/// record creation macro
///
/// ```rust
/// use fixbase_core::rec;
///
/// let r = rec!["ID" => 1, "NAME" => "sample"];
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! rec {
    ($($name:expr => $val:expr),* $(,)?) => {{
        let mut r = $crate::Record::new();
        $(
            r.push($name, $val);
        )*
        r
    }};
}
