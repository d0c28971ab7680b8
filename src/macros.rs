/// Declares a fieldless enum whose variants are spelled by a name in font
/// programs and PDF dictionaries, with `from_str`/`as_str` conversions
macro_rules! name_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$doc:meta])*
                $variant:ident = $val:literal
            ),*,
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {
            $(
                $(#[$doc])*
                $variant
            ),*,
        }

        impl $name {
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> anyhow::Result<Self> {
                match s {
                    $($val => Ok(Self::$variant),)*
                    _ => anyhow::bail!($crate::error::FontError::UnrecognizedVariant {
                        ty: stringify!($name),
                        found: s.to_owned(),
                    }),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $val,)*
                }
            }
        }
    };
}

pub(crate) use name_enum;
