// Input tables, resources and expected outputs for the golden-file tests
// WHY: offsets below are exclusive-end character offsets into the token files
#![allow(dead_code)]

/// Forum document with a poster, a descriptor-led name and a mistyped GPE;
/// social document with markers and a numeric hashtag.
pub const BIO: &str = "President ENG_DF_000001:0-9 O
Barack ENG_DF_000001:10-16 B-PER
Obama ENG_DF_000001:17-22 I-PER
met ENG_DF_000001:23-26 O
jdoe ENG_DF_000001:27-31 O
in ENG_DF_000001:32-34 O
Lagos ENG_DF_000001:35-40 B-PER

#Lagos ENG_SN_000002:0-6 O
@jdoe ENG_SN_000002:7-12 O
#2024 ENG_SN_000002:13-18 O
Abuja ENG_SN_000002:19-24 B-GPE
";

pub const BASE_TABLE: &str = "RPI\tTEDL_0000001\tObama\tENG_DF_000001:17-22\tNIL\tPER\tNAM\t1.0
RPI\tTEDL_0000002\tLagos\tENG_DF_000001:35-40\tNIL\tPER\tNAM\t1.0
RPI\tTEDL_0000003\tAbuja\tENG_SN_000002:19-24\tNIL\tGPE\tNAM\t1.0
";

pub const POSTERS: &str = "post\tENG_DF_000001\tp1\t2016-03-01T10:00:00\tjdoe
quote\tENG_DF_000001\tq1\t-\tsomeone
post\tENG_DF_000004\tp1\t2016-03-02T11:00:00\t1984
";

pub const GAZETTEER: &str = "// trusted names override the tagger
Barack Obama\tPER\tp\tobama
Abuja\tGPE\tp
# advisory names only fill gaps
Lagos\tGPE\tp2
";

pub const DESCRIPTORS: &str = "President\tPER\tp\n";

/// `add-names` over BASE_TABLE with every resource.
pub const ADD_NAMES_EXPECTED: &str = "RPI\tTEDL_0000002\tLagos\tENG_DF_000001:35-40\tNIL\tGPE\tNAM\t1.0
RPI\tTEDL_0000003\tAbuja\tENG_SN_000002:19-24\tNIL\tGPE\tNAM\t1.0
DF_poster_author\tDFPA_0000000\tjdoe\tENG_DF_000001:27-31\tNIL\tPER\tNAM\t1.0
Gazetteer\tGAZ_0000000\tPresident Barack Obama\tENG_DF_000001:0-22\tNIL\tPER\tNAM\t1.0
SN_HASH\tSNHASH_0000000\t#Lagos\tENG_SN_000002:0-6\tNIL\tGPE\tNAM\t1.0
SN_AT\tSNAT_0000001\t@jdoe\tENG_SN_000002:7-12\tNIL\tPER\tNAM\t1.0";

pub const NOISY_TABLE: &str = "RPI\tq1\tLagos\tENG_NW_000003:0-5\tNIL\tGPE\tNAM\t1.0
RPI\tq2\t12345\tENG_NW_000003:6-11\tNIL\tPER\tNAM\t1.0
RPI\tq3\t12345\tENG_SN_000002:6-11\tNIL\tPER\tNAM\t1.0
RPI\tq4\t1984\tENG_DF_000004:0-4\tNIL\tPER\tNAM\t1.0
RPI\tq5\thttp://t.co/x\tENG_NW_000003:12-25\tNIL\tORG\tNAM\t1.0
RPI\tq6\t...\tENG_NW_000003:26-29\tNIL\tORG\tNAM\t1.0
RPI\tq7\tat 10:30\tENG_NW_000003:30-38\tNIL\tORG\tNAM\t1.0
RPI\tq8\tIMG_0042.jpg\tENG_NW_000003:39-51\tNIL\tORG\tNAM\t1.0
";

pub const REMOVE_NAMES_EXPECTED: &str = "RPI\tq1\tLagos\tENG_NW_000003:0-5\tNIL\tGPE\tNAM\t1.0
RPI\tq3\t12345\tENG_SN_000002:6-11\tNIL\tPER\tNAM\t1.0
RPI\tq4\t1984\tENG_DF_000004:0-4\tNIL\tPER\tNAM\t1.0";

pub const RULES: &str = "// exact rules; ALL beats a type rule
Acme\tORG\tmv\tGPE
Acme\tALL\trm
Washington\tPER\tmv\tGPE
# substring removals
Corp\tORG\tin_rm
";

pub const RULES_TABLE: &str = "RPI\tq1\tAcme\tENG_NW_000003:0-4\tNIL\tORG\tNAM\t1.0
RPI\tq2\tWashington\tENG_NW_000003:5-15\tNIL\tPER\tNAM\t1.0
RPI\tq3\tBig Corp Ltd\tENG_NW_000003:16-28\tNIL\tORG\tNAM\t1.0
RPI\tq4\tLagos\tENG_NW_000003:29-34\tNIL\tGPE\tNAM\t1.0
";

pub const APPLY_RULES_EXPECTED: &str = "RPI\tq2\tWashington\tENG_NW_000003:5-15\tNIL\tGPE\tNAM\t1.0
RPI\tq4\tLagos\tENG_NW_000003:29-34\tNIL\tGPE\tNAM\t1.0";

pub const DICTIONARY: &str = "Lagos\tèkó
Lagos\tlagosi
Lagos\tèkó
Abuja\tabuja
";

pub const TRANSLATE_EXPECTED: &str = "RPI\tTEDL_0000001\tObama\tENG_DF_000001:17-22\tNIL\tPER\tNAM\t1.0\tNULL
RPI\tTEDL_0000002\tLagos\tENG_DF_000001:35-40\tNIL\tPER\tNAM\t1.0\tèkó|lagosi
RPI\tTEDL_0000003\tAbuja\tENG_SN_000002:19-24\tNIL\tGPE\tNAM\t1.0\tabuja";
