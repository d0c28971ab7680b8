//! Glyph name to Unicode resolution, after the Adobe Glyph List conventions

use super::tables::ZAPF_DINGBATS;

/// Unicode text for a glyph name. Handles the names used by the built-in
/// encodings, `uniXXXX` and `uXXXX[XX]` names, `.suffix` variants and `_`
/// joined ligature components. Names that only identify a glyph index
/// (`gXX`, `cidXX`) have no Unicode value
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    // everything from the first period on is a variant suffix
    let name = name.split('.').next().unwrap_or(name);

    if name.is_empty() {
        return None;
    }

    if name.contains('_') {
        let text = name
            .split('_')
            .map(component_to_unicode)
            .collect::<Option<String>>()?;

        return if text.is_empty() { None } else { Some(text) };
    }

    component_to_unicode(name)
}

/// Like [`glyph_name_to_unicode`], but only for names naming exactly one
/// character
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let text = glyph_name_to_unicode(name)?;
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn component_to_unicode(name: &str) -> Option<String> {
    if let Ok(idx) = GLYPH_LIST.binary_search_by(|(n, _)| (*n).cmp(name)) {
        return Some(GLYPH_LIST[idx].1.to_string());
    }

    if let Some(c) = dingbat(name) {
        return Some(c.to_string());
    }

    if let Some(hex) = name.strip_prefix("uni") {
        return parse_uni(hex);
    }

    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            return parse_scalar(hex).map(|c| c.to_string());
        }
    }

    None
}

/// A `uni` name holds one or more UTF-16 code units of exactly four hex digits
/// each
fn parse_uni(hex: &str) -> Option<String> {
    if hex.is_empty() || hex.len() % 4 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|digits| u16::from_str_radix(digits, 16).ok())
        })
        .collect::<Option<Vec<u16>>>()?;

    String::from_utf16(&units).ok()
}

fn parse_scalar(hex: &str) -> Option<char> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// ZapfDingbats glyphs are named `a1`..`a206` in no useful order, so they are
/// resolved through their code in the font's built-in encoding
fn dingbat(name: &str) -> Option<char> {
    let digits = name.strip_prefix('a')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let code = ZAPF_DINGBATS.iter().position(|&n| n == name)? as u32;

    let unicode = match code {
        0x25 => 0x260E,
        0x2A => 0x261B,
        0x2B => 0x261E,
        0x48 => 0x2605,
        0x6C => 0x25CF,
        0x6E => 0x25A0,
        0x73 => 0x25B2,
        0x74 => 0x25BC,
        0x75 => 0x25C6,
        0x77 => 0x25D7,
        0x21..=0x7E => 0x2700 + (code - 0x20),
        0x80..=0x8D => 0x2768 + (code - 0x80),
        0xA1..=0xA7 => 0x2761 + (code - 0xA1),
        0xA8 => 0x2663,
        0xA9 => 0x2666,
        0xAA => 0x2665,
        0xAB => 0x2660,
        0xAC..=0xB5 => 0x2460 + (code - 0xAC),
        0xB6..=0xD4 => 0x2776 + (code - 0xB6),
        0xD5 => 0x2192,
        0xD6 => 0x2194,
        0xD7 => 0x2195,
        0xD8..=0xFE => 0x2798 + (code - 0xD8),
        _ => return None,
    };

    char::from_u32(unicode)
}

/// Sorted by name
static GLYPH_LIST: &[(&str, char)] = &[
    ("A", '\u{0041}'),
    ("AE", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Abreve", '\u{0102}'),
    ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'),
    ("Agrave", '\u{00C0}'),
    ("Alpha", '\u{0391}'),
    ("Amacron", '\u{0100}'),
    ("Aogonek", '\u{0104}'),
    ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'),
    ("B", '\u{0042}'),
    ("Beta", '\u{0392}'),
    ("C", '\u{0043}'),
    ("Cacute", '\u{0106}'),
    ("Ccaron", '\u{010C}'),
    ("Ccedilla", '\u{00C7}'),
    ("Ccircumflex", '\u{0108}'),
    ("Cdotaccent", '\u{010A}'),
    ("Chi", '\u{03A7}'),
    ("D", '\u{0044}'),
    ("Dcaron", '\u{010E}'),
    ("Dcroat", '\u{0110}'),
    ("Delta", '\u{0394}'),
    ("Dslash", '\u{0110}'),
    ("E", '\u{0045}'),
    ("Eacute", '\u{00C9}'),
    ("Ebreve", '\u{0114}'),
    ("Ecaron", '\u{011A}'),
    ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'),
    ("Edotaccent", '\u{0116}'),
    ("Egrave", '\u{00C8}'),
    ("Emacron", '\u{0112}'),
    ("Eng", '\u{014A}'),
    ("Eogonek", '\u{0118}'),
    ("Epsilon", '\u{0395}'),
    ("Eta", '\u{0397}'),
    ("Eth", '\u{00D0}'),
    ("Euro", '\u{20AC}'),
    ("F", '\u{0046}'),
    ("G", '\u{0047}'),
    ("Gamma", '\u{0393}'),
    ("Gbreve", '\u{011E}'),
    ("Gcircumflex", '\u{011C}'),
    ("Gcommaaccent", '\u{0122}'),
    ("Gdotaccent", '\u{0120}'),
    ("H", '\u{0048}'),
    ("Hbar", '\u{0126}'),
    ("Hcircumflex", '\u{0124}'),
    ("I", '\u{0049}'),
    ("IJ", '\u{0132}'),
    ("Iacute", '\u{00CD}'),
    ("Ibreve", '\u{012C}'),
    ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'),
    ("Idotaccent", '\u{0130}'),
    ("Ifraktur", '\u{2111}'),
    ("Igrave", '\u{00CC}'),
    ("Imacron", '\u{012A}'),
    ("Iogonek", '\u{012E}'),
    ("Iota", '\u{0399}'),
    ("Itilde", '\u{0128}'),
    ("J", '\u{004A}'),
    ("Jcircumflex", '\u{0134}'),
    ("K", '\u{004B}'),
    ("Kappa", '\u{039A}'),
    ("Kcommaaccent", '\u{0136}'),
    ("L", '\u{004C}'),
    ("Lacute", '\u{0139}'),
    ("Lambda", '\u{039B}'),
    ("Lcaron", '\u{013D}'),
    ("Lcommaaccent", '\u{013B}'),
    ("Ldot", '\u{013F}'),
    ("Lslash", '\u{0141}'),
    ("M", '\u{004D}'),
    ("Mu", '\u{039C}'),
    ("N", '\u{004E}'),
    ("Nacute", '\u{0143}'),
    ("Ncaron", '\u{0147}'),
    ("Ncommaaccent", '\u{0145}'),
    ("Ntilde", '\u{00D1}'),
    ("Nu", '\u{039D}'),
    ("O", '\u{004F}'),
    ("OE", '\u{0152}'),
    ("Oacute", '\u{00D3}'),
    ("Obreve", '\u{014E}'),
    ("Ocircumflex", '\u{00D4}'),
    ("Odieresis", '\u{00D6}'),
    ("Ograve", '\u{00D2}'),
    ("Ohm", '\u{2126}'),
    ("Ohungarumlaut", '\u{0150}'),
    ("Omacron", '\u{014C}'),
    ("Omega", '\u{03A9}'),
    ("Omicron", '\u{039F}'),
    ("Oslash", '\u{00D8}'),
    ("Otilde", '\u{00D5}'),
    ("P", '\u{0050}'),
    ("Phi", '\u{03A6}'),
    ("Pi", '\u{03A0}'),
    ("Psi", '\u{03A8}'),
    ("Q", '\u{0051}'),
    ("R", '\u{0052}'),
    ("Racute", '\u{0154}'),
    ("Rcaron", '\u{0158}'),
    ("Rcommaaccent", '\u{0156}'),
    ("Rfraktur", '\u{211C}'),
    ("Rho", '\u{03A1}'),
    ("S", '\u{0053}'),
    ("Sacute", '\u{015A}'),
    ("Scaron", '\u{0160}'),
    ("Scedilla", '\u{015E}'),
    ("Scircumflex", '\u{015C}'),
    ("Sigma", '\u{03A3}'),
    ("T", '\u{0054}'),
    ("Tau", '\u{03A4}'),
    ("Tbar", '\u{0166}'),
    ("Tcaron", '\u{0164}'),
    ("Tcommaaccent", '\u{0162}'),
    ("Theta", '\u{0398}'),
    ("Thorn", '\u{00DE}'),
    ("U", '\u{0055}'),
    ("Uacute", '\u{00DA}'),
    ("Ubreve", '\u{016C}'),
    ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'),
    ("Ugrave", '\u{00D9}'),
    ("Uhungarumlaut", '\u{0170}'),
    ("Umacron", '\u{016A}'),
    ("Uogonek", '\u{0172}'),
    ("Upsilon", '\u{03A5}'),
    ("Upsilon1", '\u{03D2}'),
    ("Uring", '\u{016E}'),
    ("Utilde", '\u{0168}'),
    ("V", '\u{0056}'),
    ("W", '\u{0057}'),
    ("Wcircumflex", '\u{0174}'),
    ("X", '\u{0058}'),
    ("Xi", '\u{039E}'),
    ("Y", '\u{0059}'),
    ("Yacute", '\u{00DD}'),
    ("Ycircumflex", '\u{0176}'),
    ("Ydieresis", '\u{0178}'),
    ("Z", '\u{005A}'),
    ("Zacute", '\u{0179}'),
    ("Zcaron", '\u{017D}'),
    ("Zdotaccent", '\u{017B}'),
    ("Zeta", '\u{0396}'),
    ("a", '\u{0061}'),
    ("aacute", '\u{00E1}'),
    ("abreve", '\u{0103}'),
    ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'),
    ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'),
    ("afii00208", '\u{2015}'),
    ("agrave", '\u{00E0}'),
    ("aleph", '\u{2135}'),
    ("alpha", '\u{03B1}'),
    ("amacron", '\u{0101}'),
    ("ampersand", '\u{0026}'),
    ("angle", '\u{2220}'),
    ("angleleft", '\u{2329}'),
    ("angleright", '\u{232A}'),
    ("aogonek", '\u{0105}'),
    ("apple", '\u{F8FF}'),
    ("approxequal", '\u{2248}'),
    ("aring", '\u{00E5}'),
    ("arrowboth", '\u{2194}'),
    ("arrowdblboth", '\u{21D4}'),
    ("arrowdbldown", '\u{21D3}'),
    ("arrowdblleft", '\u{21D0}'),
    ("arrowdblright", '\u{21D2}'),
    ("arrowdblup", '\u{21D1}'),
    ("arrowdown", '\u{2193}'),
    ("arrowhorizex", '\u{F8E7}'),
    ("arrowleft", '\u{2190}'),
    ("arrowright", '\u{2192}'),
    ("arrowup", '\u{2191}'),
    ("arrowvertex", '\u{F8E6}'),
    ("asciicircum", '\u{005E}'),
    ("asciitilde", '\u{007E}'),
    ("asterisk", '\u{002A}'),
    ("asteriskmath", '\u{2217}'),
    ("at", '\u{0040}'),
    ("atilde", '\u{00E3}'),
    ("b", '\u{0062}'),
    ("backslash", '\u{005C}'),
    ("bar", '\u{007C}'),
    ("beta", '\u{03B2}'),
    ("braceex", '\u{F8F4}'),
    ("braceleft", '\u{007B}'),
    ("braceleftbt", '\u{F8F3}'),
    ("braceleftmid", '\u{F8F2}'),
    ("bracelefttp", '\u{F8F1}'),
    ("braceright", '\u{007D}'),
    ("bracerightbt", '\u{F8FE}'),
    ("bracerightmid", '\u{F8FD}'),
    ("bracerighttp", '\u{F8FC}'),
    ("bracketleft", '\u{005B}'),
    ("bracketleftbt", '\u{F8F0}'),
    ("bracketleftex", '\u{F8EF}'),
    ("bracketlefttp", '\u{F8EE}'),
    ("bracketright", '\u{005D}'),
    ("bracketrightbt", '\u{F8FB}'),
    ("bracketrightex", '\u{F8FA}'),
    ("bracketrighttp", '\u{F8F9}'),
    ("breve", '\u{02D8}'),
    ("brokenbar", '\u{00A6}'),
    ("bullet", '\u{2022}'),
    ("c", '\u{0063}'),
    ("cacute", '\u{0107}'),
    ("caron", '\u{02C7}'),
    ("carriagereturn", '\u{21B5}'),
    ("ccaron", '\u{010D}'),
    ("ccedilla", '\u{00E7}'),
    ("ccircumflex", '\u{0109}'),
    ("cdotaccent", '\u{010B}'),
    ("cedilla", '\u{00B8}'),
    ("cent", '\u{00A2}'),
    ("chi", '\u{03C7}'),
    ("circlemultiply", '\u{2297}'),
    ("circleplus", '\u{2295}'),
    ("circumflex", '\u{02C6}'),
    ("club", '\u{2663}'),
    ("colon", '\u{003A}'),
    ("comma", '\u{002C}'),
    ("commaaccent", '\u{F6C3}'),
    ("congruent", '\u{2245}'),
    ("copyright", '\u{00A9}'),
    ("copyrightsans", '\u{F8E9}'),
    ("copyrightserif", '\u{F6D9}'),
    ("currency", '\u{00A4}'),
    ("d", '\u{0064}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("dcaron", '\u{010F}'),
    ("dcroat", '\u{0111}'),
    ("degree", '\u{00B0}'),
    ("delta", '\u{03B4}'),
    ("diamond", '\u{2666}'),
    ("dieresis", '\u{00A8}'),
    ("dieresistonos", '\u{0385}'),
    ("divide", '\u{00F7}'),
    ("dollar", '\u{0024}'),
    ("dotaccent", '\u{02D9}'),
    ("dotlessi", '\u{0131}'),
    ("dotmath", '\u{22C5}'),
    ("dslash", '\u{0111}'),
    ("e", '\u{0065}'),
    ("eacute", '\u{00E9}'),
    ("ebreve", '\u{0115}'),
    ("ecaron", '\u{011B}'),
    ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'),
    ("edotaccent", '\u{0117}'),
    ("egrave", '\u{00E8}'),
    ("eight", '\u{0038}'),
    ("element", '\u{2208}'),
    ("ellipsis", '\u{2026}'),
    ("emacron", '\u{0113}'),
    ("emdash", '\u{2014}'),
    ("emptyset", '\u{2205}'),
    ("endash", '\u{2013}'),
    ("eng", '\u{014B}'),
    ("eogonek", '\u{0119}'),
    ("epsilon", '\u{03B5}'),
    ("equal", '\u{003D}'),
    ("equivalence", '\u{2261}'),
    ("eta", '\u{03B7}'),
    ("eth", '\u{00F0}'),
    ("exclam", '\u{0021}'),
    ("exclamdown", '\u{00A1}'),
    ("exclamsmall", '\u{F721}'),
    ("existential", '\u{2203}'),
    ("f", '\u{0066}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '\u{0035}'),
    ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'),
    ("four", '\u{0034}'),
    ("fraction", '\u{2044}'),
    ("g", '\u{0067}'),
    ("gamma", '\u{03B3}'),
    ("gbreve", '\u{011F}'),
    ("gcircumflex", '\u{011D}'),
    ("gcommaaccent", '\u{0123}'),
    ("gdotaccent", '\u{0121}'),
    ("germandbls", '\u{00DF}'),
    ("gradient", '\u{2207}'),
    ("grave", '\u{0060}'),
    ("greater", '\u{003E}'),
    ("greaterequal", '\u{2265}'),
    ("guillemotleft", '\u{00AB}'),
    ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("h", '\u{0068}'),
    ("hbar", '\u{0127}'),
    ("hcircumflex", '\u{0125}'),
    ("heart", '\u{2665}'),
    ("hungarumlaut", '\u{02DD}'),
    ("hyphen", '\u{002D}'),
    ("i", '\u{0069}'),
    ("iacute", '\u{00ED}'),
    ("ibreve", '\u{012D}'),
    ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'),
    ("igrave", '\u{00EC}'),
    ("ij", '\u{0133}'),
    ("imacron", '\u{012B}'),
    ("infinity", '\u{221E}'),
    ("integral", '\u{222B}'),
    ("integralbt", '\u{2321}'),
    ("integralex", '\u{F8F5}'),
    ("integraltp", '\u{2320}'),
    ("intersection", '\u{2229}'),
    ("iogonek", '\u{012F}'),
    ("iota", '\u{03B9}'),
    ("itilde", '\u{0129}'),
    ("j", '\u{006A}'),
    ("jcircumflex", '\u{0135}'),
    ("k", '\u{006B}'),
    ("kappa", '\u{03BA}'),
    ("kcommaaccent", '\u{0137}'),
    ("kgreenlandic", '\u{0138}'),
    ("l", '\u{006C}'),
    ("lacute", '\u{013A}'),
    ("lambda", '\u{03BB}'),
    ("lcaron", '\u{013E}'),
    ("lcommaaccent", '\u{013C}'),
    ("ldot", '\u{0140}'),
    ("less", '\u{003C}'),
    ("lessequal", '\u{2264}'),
    ("logicaland", '\u{2227}'),
    ("logicalnot", '\u{00AC}'),
    ("logicalor", '\u{2228}'),
    ("longs", '\u{017F}'),
    ("lozenge", '\u{25CA}'),
    ("lslash", '\u{0142}'),
    ("m", '\u{006D}'),
    ("macron", '\u{00AF}'),
    ("minus", '\u{2212}'),
    ("minute", '\u{2032}'),
    ("mu", '\u{00B5}'),
    ("multiply", '\u{00D7}'),
    ("n", '\u{006E}'),
    ("nacute", '\u{0144}'),
    ("napostrophe", '\u{0149}'),
    ("nbspace", '\u{00A0}'),
    ("ncaron", '\u{0148}'),
    ("ncommaaccent", '\u{0146}'),
    ("nine", '\u{0039}'),
    ("notelement", '\u{2209}'),
    ("notequal", '\u{2260}'),
    ("notsubset", '\u{2284}'),
    ("ntilde", '\u{00F1}'),
    ("nu", '\u{03BD}'),
    ("numbersign", '\u{0023}'),
    ("o", '\u{006F}'),
    ("oacute", '\u{00F3}'),
    ("obreve", '\u{014F}'),
    ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'),
    ("oe", '\u{0153}'),
    ("ogonek", '\u{02DB}'),
    ("ograve", '\u{00F2}'),
    ("ohungarumlaut", '\u{0151}'),
    ("omacron", '\u{014D}'),
    ("omega", '\u{03C9}'),
    ("omega1", '\u{03D6}'),
    ("omicron", '\u{03BF}'),
    ("one", '\u{0031}'),
    ("onedotenleader", '\u{2024}'),
    ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'),
    ("onesuperior", '\u{00B9}'),
    ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'),
    ("otilde", '\u{00F5}'),
    ("p", '\u{0070}'),
    ("paragraph", '\u{00B6}'),
    ("parenleft", '\u{0028}'),
    ("parenleftbt", '\u{F8ED}'),
    ("parenleftex", '\u{F8EC}'),
    ("parenlefttp", '\u{F8EB}'),
    ("parenright", '\u{0029}'),
    ("parenrightbt", '\u{F8F8}'),
    ("parenrightex", '\u{F8F7}'),
    ("parenrighttp", '\u{F8F6}'),
    ("partialdiff", '\u{2202}'),
    ("percent", '\u{0025}'),
    ("period", '\u{002E}'),
    ("periodcentered", '\u{00B7}'),
    ("perpendicular", '\u{22A5}'),
    ("perthousand", '\u{2030}'),
    ("phi", '\u{03C6}'),
    ("phi1", '\u{03D5}'),
    ("pi", '\u{03C0}'),
    ("plus", '\u{002B}'),
    ("plusminus", '\u{00B1}'),
    ("product", '\u{220F}'),
    ("propersubset", '\u{2282}'),
    ("propersuperset", '\u{2283}'),
    ("proportional", '\u{221D}'),
    ("psi", '\u{03C8}'),
    ("q", '\u{0071}'),
    ("question", '\u{003F}'),
    ("questiondown", '\u{00BF}'),
    ("quotedbl", '\u{0022}'),
    ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quotereversed", '\u{201B}'),
    ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\u{0027}'),
    ("r", '\u{0072}'),
    ("racute", '\u{0155}'),
    ("radical", '\u{221A}'),
    ("radicalex", '\u{F8E5}'),
    ("rcaron", '\u{0159}'),
    ("rcommaaccent", '\u{0157}'),
    ("reflexsubset", '\u{2286}'),
    ("reflexsuperset", '\u{2287}'),
    ("registered", '\u{00AE}'),
    ("registersans", '\u{F8E8}'),
    ("registerserif", '\u{F6DA}'),
    ("rho", '\u{03C1}'),
    ("ring", '\u{02DA}'),
    ("s", '\u{0073}'),
    ("sacute", '\u{015B}'),
    ("scaron", '\u{0161}'),
    ("scedilla", '\u{015F}'),
    ("scircumflex", '\u{015D}'),
    ("second", '\u{2033}'),
    ("section", '\u{00A7}'),
    ("semicolon", '\u{003B}'),
    ("seven", '\u{0037}'),
    ("sfthyphen", '\u{00AD}'),
    ("sigma", '\u{03C3}'),
    ("sigma1", '\u{03C2}'),
    ("similar", '\u{223C}'),
    ("six", '\u{0036}'),
    ("slash", '\u{002F}'),
    ("space", '\u{0020}'),
    ("spade", '\u{2660}'),
    ("sterling", '\u{00A3}'),
    ("suchthat", '\u{220B}'),
    ("summation", '\u{2211}'),
    ("t", '\u{0074}'),
    ("tau", '\u{03C4}'),
    ("tbar", '\u{0167}'),
    ("tcaron", '\u{0165}'),
    ("tcommaaccent", '\u{0163}'),
    ("therefore", '\u{2234}'),
    ("theta", '\u{03B8}'),
    ("theta1", '\u{03D1}'),
    ("thorn", '\u{00FE}'),
    ("three", '\u{0033}'),
    ("threequarters", '\u{00BE}'),
    ("threesuperior", '\u{00B3}'),
    ("tilde", '\u{02DC}'),
    ("tonos", '\u{0384}'),
    ("trademark", '\u{2122}'),
    ("trademarksans", '\u{F8EA}'),
    ("trademarkserif", '\u{F6DB}'),
    ("two", '\u{0032}'),
    ("twodotenleader", '\u{2025}'),
    ("twosuperior", '\u{00B2}'),
    ("u", '\u{0075}'),
    ("uacute", '\u{00FA}'),
    ("ubreve", '\u{016D}'),
    ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'),
    ("ugrave", '\u{00F9}'),
    ("uhungarumlaut", '\u{0171}'),
    ("umacron", '\u{016B}'),
    ("underscore", '\u{005F}'),
    ("union", '\u{222A}'),
    ("universal", '\u{2200}'),
    ("uogonek", '\u{0173}'),
    ("upsilon", '\u{03C5}'),
    ("uring", '\u{016F}'),
    ("utilde", '\u{0169}'),
    ("v", '\u{0076}'),
    ("w", '\u{0077}'),
    ("wcircumflex", '\u{0175}'),
    ("weierstrass", '\u{2118}'),
    ("x", '\u{0078}'),
    ("xi", '\u{03BE}'),
    ("y", '\u{0079}'),
    ("yacute", '\u{00FD}'),
    ("ycircumflex", '\u{0177}'),
    ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("z", '\u{007A}'),
    ("zacute", '\u{017A}'),
    ("zcaron", '\u{017E}'),
    ("zdotaccent", '\u{017C}'),
    ("zero", '\u{0030}'),
    ("zeta", '\u{03B6}'),
];
