use std::sync::Arc;

use crate::encoding::{BuiltinEncoding, DifferenceItem, Encoding};

/// The encoding a document assigns to a simple font
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingSpec {
    Builtin(BuiltinEncoding),

    /// A `Differences` array over `base`, or over the font program's own
    /// encoding when there is no base
    Differences {
        base: Option<BuiltinEncoding>,
        differences: Vec<DifferenceItem>,
    },
}

impl EncodingSpec {
    /// Resolves the encoding against the encoding built into the font program,
    /// `StandardEncoding` for programs without one
    pub(super) fn resolve(&self, program_encoding: Option<&Encoding>) -> Arc<Encoding> {
        match self {
            Self::Builtin(builtin) => Arc::new(Encoding::builtin(*builtin).clone()),
            Self::Differences { base, differences } => {
                let base = match base {
                    Some(builtin) => Encoding::builtin(*builtin),
                    None => program_encoding
                        .unwrap_or_else(|| Encoding::builtin(BuiltinEncoding::Standard)),
                };

                Arc::new(Encoding::with_differences(base, differences))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn differences_over_program_encoding() {
        let program = Encoding::from_names([(65u8, "alpha"), (66, "beta")]);
        let spec = EncodingSpec::Differences {
            base: None,
            differences: vec![DifferenceItem::Code(66), DifferenceItem::Name("gamma".to_owned())],
        };

        let encoding = spec.resolve(Some(&program));

        assert_eq!(encoding.get_name(65), Some("alpha"));
        assert_eq!(encoding.get_name(66), Some("gamma"));
    }

    #[test]
    fn differences_without_any_base_use_standard() {
        let spec = EncodingSpec::Differences {
            base: None,
            differences: vec![DifferenceItem::Code(32), DifferenceItem::Name("bullet".to_owned())],
        };

        let encoding = spec.resolve(None);

        assert_eq!(encoding.get_name(32), Some("bullet"));
        assert_eq!(encoding.get_name(65), Some("A"));
    }
}
