use super::{registry::CMapResourceProvider, PredefinedCMapName};

/// Leading byte ranges and the length of the codes they start
type CodeSpace = &'static [(u8, u8, usize)];

const SHIFT_JIS: CodeSpace = &[(0x00, 0x80, 1), (0x81, 0x9f, 2), (0xa0, 0xdf, 1), (0xe0, 0xfc, 2)];
const EUC_JP: CodeSpace = &[(0x00, 0x80, 1), (0x8e, 0x8e, 2), (0xa1, 0xfe, 2)];
const ISO_2022: CodeSpace = &[(0x21, 0x7e, 2)];
const EUC: CodeSpace = &[(0x00, 0x80, 1), (0xa1, 0xfe, 2)];
const EUC_PC: CodeSpace = &[(0x00, 0x80, 1), (0xa1, 0xfc, 2), (0xfd, 0xff, 1)];
const GBK: CodeSpace = &[(0x00, 0x80, 1), (0x81, 0xfe, 2)];
const BIG5: CodeSpace = &[(0x00, 0x80, 1), (0xa1, 0xfe, 2)];
const HKSCS: CodeSpace = &[(0x00, 0x80, 1), (0x88, 0xfe, 2)];
const UNICODE: CodeSpace = &[(0x00, 0xff, 2)];

/// The code space layouts of the predefined CMaps, served as CMap programs.
///
/// Adobe's CID tables are not bundled: every code maps to the CID of the same
/// value. A [`CMapResourceProvider`] holding the full resources takes precedence
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCMaps;

impl BundledCMaps {
    fn code_space(name: PredefinedCMapName) -> Option<CodeSpace> {
        use PredefinedCMapName::*;

        Some(match name {
            _83pvRksjH | _90msRksjH | _90msRksjV | _90mspRksjH | _90mspRksjV | _90pvRksjH
            | AddRksjH | AddRksjV | ExtRksjH | ExtRksjV => SHIFT_JIS,
            EucH | EucV => EUC_JP,
            H | V => ISO_2022,
            GbEucH | GbEucV | CnsEucH | CnsEucV | KscEucH | KscEucV => EUC,
            GbpcEucH | GbpcEucV | KscpcEucH => EUC_PC,
            GbkEucH | GbkEucV | GbkpEucH | GbkpEucV | Gbk2kH | Gbk2kV | KscmsUhcH | KscmsUhcV
            | KscmsUhcHwH | KscmsUhcHwV => GBK,
            B5pcH | B5pcV | ETenB5H | ETenB5V | ETenmsB5H | ETenmsB5V => BIG5,
            HkscsB5H | HkscsB5V => HKSCS,
            UniGbUcs2H | UniGbUcs2V | UniGbUtf16H | UniGbUtf16V | UniCnsUcs2H | UniCnsUcs2V
            | UniCnsUtf16H | UniCnsUtf16V | UniJisUcs2H | UniJisUcs2V | UniJisUcs2HwH
            | UniJisUcs2HwV | UniJisUtf16H | UniJisUtf16V | UniKsUcs2H | UniKsUcs2V
            | UniKsUtf16H | UniKsUtf16V => UNICODE,
            IdentityH | IdentityV => return None,
        })
    }

    fn program(name: PredefinedCMapName, code_space: CodeSpace) -> String {
        let mut ranges = String::new();
        let mut cids = String::new();

        for &(lead_low, lead_high, length) in code_space {
            let low = hex_code(lead_low, 0x00, length);
            let high = hex_code(lead_high, 0xff, length);

            // codes map to the CID of the same value
            let first = match length {
                1 => u16::from(lead_low),
                _ => u16::from_be_bytes([lead_low, 0x00]),
            };

            ranges.push_str(&format!("{} {}\n", low, high));
            cids.push_str(&format!("{} {} {}\n", low, high, first));
        }

        format!(
            "/CMapName /{name} def\n/WMode {mode} def\n\
             {n} begincodespacerange\n{ranges}endcodespacerange\n\
             {n} begincidrange\n{cids}endcidrange\n",
            name = name.as_str(),
            mode = u8::from(name.is_vertical()),
            n = code_space.len(),
            ranges = ranges,
            cids = cids,
        )
    }
}

/// `<hh>`, or `<hhtt>` with `trail` as the second byte
fn hex_code(lead: u8, trail: u8, length: usize) -> String {
    if length == 1 {
        format!("<{:02x}>", lead)
    } else {
        format!("<{:02x}{:02x}>", lead, trail)
    }
}

impl CMapResourceProvider for BundledCMaps {
    fn cmap_program(&self, name: &str) -> Option<Vec<u8>> {
        let name = PredefinedCMapName::from_str(name).ok()?;
        let code_space = Self::code_space(name)?;

        Some(Self::program(name, code_space).into_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn programs_declare_code_space_and_cids() {
        let program = BundledCMaps.cmap_program("EUC-V").unwrap();
        let program = String::from_utf8(program).unwrap();

        assert!(program.contains("/WMode 1 def"));
        assert!(program.contains("<8e00> <8eff>"));
        assert!(program.contains("<a100> <feff> 41216"));
        assert!(BundledCMaps.cmap_program("Identity-H").is_none());
        assert!(BundledCMaps.cmap_program("Custom-H").is_none());
    }
}
