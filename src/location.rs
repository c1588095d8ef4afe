use core::fmt;

/// Where an exception was thrown, or where a protected block was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    file: &'static str,
    function: Option<&'static str>,
    line: u32,
}

impl Location {
    #[inline]
    #[must_use]
    pub const fn new(file: &'static str, function: Option<&'static str>, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// The location of the caller, as tracked by `#[track_caller]`.
    ///
    /// The enclosing function is not known this way; use [`location!`](crate::location!) to
    /// record it as well.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let caller = core::panic::Location::caller();
        Self::new(caller.file(), None, caller.line())
    }

    #[inline]
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    #[inline]
    #[must_use]
    pub const fn function(&self) -> Option<&'static str> {
        self.function
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.function {
            Some(function) => write!(f, "{}:{function}:{}", self.file, self.line),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// The bare name of the function a `location!()` call sits in, given the type path of an item
/// declared inside it.
///
/// Closure segments and the module path are dropped, so a call inside a closure in
/// `crate::io::read_block` yields `read_block`.
#[doc(hidden)]
#[inline]
#[must_use]
pub fn function_name(item_path: &'static str) -> &'static str {
    let mut path = item_path.rsplit_once("::").map_or(item_path, |(parent, _)| parent);
    while let Some(parent) = path.strip_suffix("::{{closure}}") {
        path = parent;
    }
    path.rsplit("::").next().unwrap_or(path)
}

/// Expands to the [`Location`] of the macro call, including the enclosing function's name.
///
/// ```rust
/// use tryframe::location;
///
/// fn open() -> tryframe::Location {
///     location!()
/// }
///
/// let here = open();
/// assert_eq!(here.function(), Some("open"));
/// let nested = (|| location!())();
/// assert_eq!(nested.function(), Some("main"));
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::core::file!(),
            ::core::option::Option::Some({
                fn f() {}
                fn type_name_of<T>(_: T) -> &'static str {
                    ::core::any::type_name::<T>()
                }
                $crate::function_name(type_name_of(f))
            }),
            ::core::line!(),
        )
    };
}
