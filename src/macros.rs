// src/macros.rs

/// `String` from anything `String::from` accepts; `s!()` is an empty string.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate string pieces into a new `String`:
/// `join!(stem, ".csv")`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $(
            out.push_str($rest);
        )+
        out
    }};
}
