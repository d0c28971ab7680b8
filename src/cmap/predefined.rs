use crate::macros::name_enum;

name_enum! {
    /// Names of the CMaps every conforming reader knows without an embedded program
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PredefinedCMapName {
        // Adobe-GB1
        GbEucH = "GB-EUC-H",
        GbEucV = "GB-EUC-V",
        GbpcEucH = "GBpc-EUC-H",
        GbpcEucV = "GBpc-EUC-V",
        GbkEucH = "GBK-EUC-H",
        GbkEucV = "GBK-EUC-V",
        GbkpEucH = "GBKp-EUC-H",
        GbkpEucV = "GBKp-EUC-V",
        Gbk2kH = "GBK2K-H",
        Gbk2kV = "GBK2K-V",
        UniGbUcs2H = "UniGB-UCS2-H",
        UniGbUcs2V = "UniGB-UCS2-V",
        UniGbUtf16H = "UniGB-UTF16-H",
        UniGbUtf16V = "UniGB-UTF16-V",

        // Adobe-CNS1
        B5pcH = "B5pc-H",
        B5pcV = "B5pc-V",
        HkscsB5H = "HKscs-B5-H",
        HkscsB5V = "HKscs-B5-V",
        ETenB5H = "ETen-B5-H",
        ETenB5V = "ETen-B5-V",
        ETenmsB5H = "ETenms-B5-H",
        ETenmsB5V = "ETenms-B5-V",
        CnsEucH = "CNS-EUC-H",
        CnsEucV = "CNS-EUC-V",
        UniCnsUcs2H = "UniCNS-UCS2-H",
        UniCnsUcs2V = "UniCNS-UCS2-V",
        UniCnsUtf16H = "UniCNS-UTF16-H",
        UniCnsUtf16V = "UniCNS-UTF16-V",

        // Adobe-Japan1
        _83pvRksjH = "83pv-RKSJ-H",
        _90msRksjH = "90ms-RKSJ-H",
        _90msRksjV = "90ms-RKSJ-V",
        _90mspRksjH = "90msp-RKSJ-H",
        _90mspRksjV = "90msp-RKSJ-V",
        _90pvRksjH = "90pv-RKSJ-H",
        AddRksjH = "Add-RKSJ-H",
        AddRksjV = "Add-RKSJ-V",
        EucH = "EUC-H",
        EucV = "EUC-V",
        ExtRksjH = "Ext-RKSJ-H",
        ExtRksjV = "Ext-RKSJ-V",
        H = "H",
        V = "V",
        UniJisUcs2H = "UniJIS-UCS2-H",
        UniJisUcs2V = "UniJIS-UCS2-V",
        UniJisUcs2HwH = "UniJIS-UCS2-HW-H",
        UniJisUcs2HwV = "UniJIS-UCS2-HW-V",
        UniJisUtf16H = "UniJIS-UTF16-H",
        UniJisUtf16V = "UniJIS-UTF16-V",

        // Adobe-Korea1
        KscEucH = "KSC-EUC-H",
        KscEucV = "KSC-EUC-V",
        KscmsUhcH = "KSCms-UHC-H",
        KscmsUhcV = "KSCms-UHC-V",
        KscmsUhcHwH = "KSCms-UHC-HW-H",
        KscmsUhcHwV = "KSCms-UHC-HW-V",
        KscpcEucH = "KSCpc-EUC-H",
        UniKsUcs2H = "UniKS-UCS2-H",
        UniKsUcs2V = "UniKS-UCS2-V",
        UniKsUtf16H = "UniKS-UTF16-H",
        UniKsUtf16V = "UniKS-UTF16-V",

        IdentityH = "Identity-H",
        IdentityV = "Identity-V",
    }
}

impl PredefinedCMapName {
    pub fn is_vertical(self) -> bool {
        self.as_str().ends_with('V')
    }

    /// The ordering of the character collection the CMap's CIDs belong to
    pub fn character_collection(self) -> &'static str {
        use PredefinedCMapName::*;

        match self {
            GbEucH | GbEucV | GbpcEucH | GbpcEucV | GbkEucH | GbkEucV | GbkpEucH | GbkpEucV
            | Gbk2kH | Gbk2kV | UniGbUcs2H | UniGbUcs2V | UniGbUtf16H | UniGbUtf16V => "Adobe-GB1",
            B5pcH | B5pcV | HkscsB5H | HkscsB5V | ETenB5H | ETenB5V | ETenmsB5H | ETenmsB5V
            | CnsEucH | CnsEucV | UniCnsUcs2H | UniCnsUcs2V | UniCnsUtf16H | UniCnsUtf16V => {
                "Adobe-CNS1"
            }
            KscEucH | KscEucV | KscmsUhcH | KscmsUhcV | KscmsUhcHwH | KscmsUhcHwV | KscpcEucH
            | UniKsUcs2H | UniKsUcs2V | UniKsUtf16H | UniKsUtf16V => "Adobe-Korea1",
            IdentityH | IdentityV => "Identity",
            _ => "Adobe-Japan1",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_names() {
        let name = PredefinedCMapName::from_str("UniJIS-UCS2-HW-V").unwrap();

        assert_eq!(name, PredefinedCMapName::UniJisUcs2HwV);
        assert!(name.is_vertical());
        assert_eq!(name.character_collection(), "Adobe-Japan1");
        assert!(!PredefinedCMapName::H.is_vertical());
        assert!(PredefinedCMapName::from_str("Identity").is_err());
    }
}
