use serde_json::Value;
use std::process::Command;

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{assert_golden_file, TestFixture};

fn nametab(subcommand: &str) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nametab"));
    command.arg(subcommand);
    command
}

#[test]
fn test_add_names_cli_with_stats() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("base.tab", BASE_TABLE);
    let bio = fixture.create_file("docs.bio", BIO);
    let posters = fixture.create_file("posters.tsv", POSTERS);
    let gazetteer = fixture.create_file("gaz.tsv", GAZETTEER);
    let descriptors = fixture.create_file("des.tsv", DESCRIPTORS);
    let out = fixture.output_path("out.tab");
    let stats = fixture.output_path("stats.json");

    let output = nametab("add-names")
        .arg(&table)
        .arg(&bio)
        .arg(&out)
        .arg("--posters")
        .arg(&posters)
        .arg("--gazetteer")
        .arg(&gazetteer)
        .arg("--descriptors")
        .arg(&descriptors)
        .arg("--stats-out")
        .arg(&stats)
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "add-names failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read_file("out.tab"), ADD_NAMES_EXPECTED, "add-names CLI");

    let stats: Value = serde_json::from_str(&fixture.read_file("stats.json")).expect("Failed to parse JSON");
    assert_eq!(stats["command"], "add-names");
    assert_eq!(stats["input_rows"], 3);
    assert_eq!(stats["output_rows"], 6);
    assert_eq!(stats["inputs"].as_array().unwrap().len(), 5);
    let merges = stats["audit"]["merges"].as_array().expect("merges should be an array");
    assert_eq!(merges.len(), 4);
    assert_eq!(merges[1]["stage"], "gazetteer_p");
    assert_eq!(merges[1]["duplicates"], 1);
}

#[test]
fn test_add_names_cli_without_social() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("base.tab", BASE_TABLE);
    let bio = fixture.create_file("docs.bio", BIO);
    let out = fixture.output_path("out.tab");

    let output = nametab("add-names")
        .arg(&table)
        .arg(&bio)
        .arg(&out)
        .arg("--no-social")
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "add-names failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read_file("out.tab"), BASE_TABLE, "add-names without resources");
}

#[test]
fn test_remove_names_cli() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("noisy.tab", NOISY_TABLE);
    let posters = fixture.create_file("posters.tsv", POSTERS);
    let out = fixture.output_path("clean.tab");

    let output = nametab("remove-names")
        .arg(&table)
        .arg(&out)
        .arg("--posters")
        .arg(&posters)
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "remove-names failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read_file("clean.tab"), REMOVE_NAMES_EXPECTED, "remove-names CLI");
}

#[test]
fn test_apply_rules_cli() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("in.tab", RULES_TABLE);
    let rules = fixture.create_file("rules.tsv", RULES);
    let out = fixture.output_path("out.tab");

    let output = nametab("apply-rules")
        .arg(&table)
        .arg(&rules)
        .arg(&out)
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "apply-rules failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read_file("out.tab"), APPLY_RULES_EXPECTED, "apply-rules CLI");
}

#[test]
fn test_translate_cli_prints_count() {
    let fixture = TestFixture::new();
    let dictionary = fixture.create_file("dic.tsv", DICTIONARY);
    let table = fixture.create_file("in.tab", BASE_TABLE);
    let out = fixture.output_path("out.tab");

    let output = nametab("translate")
        .arg(&dictionary)
        .arg(&table)
        .arg(&out)
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "translate failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2");
    assert_golden_file(&fixture.read_file("out.tab"), TRANSLATE_EXPECTED, "translate CLI");
}

#[test]
fn test_bad_rule_file_writes_nothing() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("in.tab", RULES_TABLE);
    let rules = fixture.create_file("rules.tsv", "Acme\tORG\tdelete\n");
    let out = fixture.output_path("out.tab");

    let output = nametab("apply-rules")
        .arg(&table)
        .arg(&rules)
        .arg(&out)
        .output()
        .expect("Failed to run nametab");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown rule operation"));
    assert!(!fixture.exists("out.tab"));
}

#[test]
fn test_malformed_table_reports_line() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("in.tab", "RPI\tq1\tLagos\tENG_NW_000003:0-5\tNIL\tGPE\tNAM\t1.0\nRPI\tq2\tAbuja\n");
    let out = fixture.output_path("out.tab");

    let output = nametab("remove-names")
        .arg(&table)
        .arg(&out)
        .output()
        .expect("Failed to run nametab");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
    assert!(!fixture.exists("out.tab"));
}

#[test]
fn test_no_social_ignores_social_gazetteer() {
    let fixture = TestFixture::new();
    let table = fixture.create_file("base.tab", BASE_TABLE);
    let bio = fixture.create_file("docs.bio", BIO);
    let social = fixture.create_file("sn.tsv", "#Lagos\tCITY\tp\n");
    let out = fixture.output_path("out.tab");

    let output = nametab("add-names")
        .arg(&table)
        .arg(&bio)
        .arg(&out)
        .arg("--social-gazetteer")
        .arg(&social)
        .arg("--no-social")
        .output()
        .expect("Failed to run nametab");

    assert!(output.status.success(), "add-names failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read_file("out.tab"), BASE_TABLE, "add-names with social stage off");
}
