//! Macros for declaring state labels.

/// Declare a fieldless enum whose variants name the states of a definition.
///
/// The generated enum implements [`Label`](crate::core::Label), `Display` and
/// `AsRef<str>`, and converts into [`StateName`](crate::core::StateName), so
/// variants can be passed anywhere a state name is expected.
///
/// # Example
///
/// ```
/// use waypoint::core::Label;
/// use waypoint::label_enum;
///
/// label_enum! {
///     pub enum Post {
///         Draft,
///         Published,
///     }
/// }
///
/// assert_eq!(Post::Draft.name(), "Draft");
/// assert_eq!(Post::from_name("Published"), Some(Post::Published));
/// assert_eq!(Post::all().len(), 2);
/// ```
#[macro_export]
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Label for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    $(stringify!($variant) => ::std::option::Option::Some(Self::$variant),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn all() -> &'static [Self] {
                &[$(Self::$variant),*]
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                $crate::core::Label::name(self)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::Label::name(self))
            }
        }

        impl ::std::convert::From<$name> for $crate::core::StateName {
            fn from(label: $name) -> Self {
                $crate::core::StateName::new($crate::core::Label::name(&label))
            }
        }

        impl ::std::convert::From<$name> for ::std::string::String {
            fn from(label: $name) -> Self {
                ::std::string::String::from($crate::core::Label::name(&label))
            }
        }
    };
}
