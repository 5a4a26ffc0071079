use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn notearkiv(sandbox: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("notearkiv");
    cmd.env("NOTEARKIV_CONFIG_PATH", sandbox.join("config.toml"))
        .env("NOTEARKIV_ROOT", sandbox.join("arkiv"));
    cmd
}

fn source_folder(sandbox: &Path, name: &str, sections: &[&str]) -> std::path::PathBuf {
    let dir = sandbox.join("incoming").join(name);
    fs::create_dir_all(&dir).expect("mkdir source");
    for section in sections {
        fs::write(dir.join(format!("{name} - {section}.pdf")), b"%PDF-1.4").expect("write pdf");
    }
    dir
}

#[test]
fn add_catalogs_a_piece_and_copies_its_section_files() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");
    let source = source_folder(sandbox, "Vårsøg", &["partitur", "messing"]);

    notearkiv(sandbox)
        .arg("add")
        .arg(&source)
        .args(["--composer", "Henning Sommerro"])
        .assert()
        .success();

    assert!(sandbox.join("arkiv/_arkiv.xlsx").is_file());
    assert!(sandbox.join("arkiv/Vårsøg/Vårsøg - partitur.pdf").is_file());
    assert!(sandbox.join("arkiv/Vårsøg/Vårsøg - messing.pdf").is_file());
    assert!(!sandbox.join("arkiv/Vårsøg/Vårsøg - treblås.pdf").exists());

    notearkiv(sandbox)
        .arg("print")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vårsøg"))
        .stdout(predicate::str::contains("Henning Sommerro"))
        .stdout(predicate::str::contains("Number of rows: 1"));
}

#[test]
fn print_filter_matches_case_and_accent_variants() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");
    let source = source_folder(sandbox, "Ødegård", &[]);

    notearkiv(sandbox).arg("add").arg(&source).assert().success();

    notearkiv(sandbox)
        .args(["print", "ødegård"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ødegård"));

    // An unknown filter prints no data rows but still reports the count.
    notearkiv(sandbox)
        .args(["print", "Unknown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of rows: 1"));
}

#[test]
fn update_merges_metadata_unless_forced() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");
    let source = source_folder(sandbox, "Alpha", &[]);

    notearkiv(sandbox)
        .arg("add")
        .arg(&source)
        .args(["--composer", "Grieg"])
        .assert()
        .success();

    // Non-forced update keeps fields whose option was not given.
    notearkiv(sandbox)
        .args(["update", "Alpha", "--arranger", "Hanssen"])
        .assert()
        .success();
    notearkiv(sandbox)
        .arg("print")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grieg"))
        .stdout(predicate::str::contains("Hanssen"));

    // Forced update overwrites both, empty values included.
    notearkiv(sandbox)
        .args(["update", "Alpha", "--force", "--composer", "Svendsen"])
        .assert()
        .success();
    notearkiv(sandbox)
        .arg("print")
        .assert()
        .success()
        .stdout(predicate::str::contains("Svendsen"))
        .stdout(predicate::str::contains("Hanssen").not());
}

#[test]
fn update_reprobes_section_files_from_the_piece_folder() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");
    let source = source_folder(sandbox, "Alpha", &[]);

    notearkiv(sandbox).arg("add").arg(&source).assert().success();
    notearkiv(sandbox)
        .args(["print", "Alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ja").not());

    fs::write(
        sandbox.join("arkiv/Alpha/Alpha - slagverk.pdf"),
        b"%PDF-1.4",
    )
    .expect("write pdf");
    notearkiv(sandbox).args(["update", "Alpha"]).assert().success();

    notearkiv(sandbox)
        .args(["print", "Alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ja"));
}

#[test]
fn update_of_unknown_piece_fails() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");

    notearkiv(sandbox)
        .args(["update", "Spectre"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no piece named"));
}

#[test]
fn delete_removes_one_piece_and_its_row_survives_reload() {
    let tmp = tempdir().expect("tempdir");
    let sandbox = tmp.path();
    fs::create_dir_all(sandbox.join("arkiv")).expect("mkdir root");
    let alpha = source_folder(sandbox, "Alpha", &["partitur"]);
    let bravo = source_folder(sandbox, "Bravo", &[]);

    notearkiv(sandbox)
        .arg("add")
        .arg(&alpha)
        .args(["--composer", "Edvard"])
        .assert()
        .success();
    notearkiv(sandbox)
        .arg("add")
        .arg(&bravo)
        .args(["--composer", "Johan"])
        .assert()
        .success();

    notearkiv(sandbox).args(["delete", "Bravo"]).assert().success();

    // Reload from disk: exactly the untouched row remains, fields intact.
    notearkiv(sandbox)
        .arg("print")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("Edvard"))
        .stdout(predicate::str::contains("Bravo").not())
        .stdout(predicate::str::contains("Number of rows: 1"));

    notearkiv(sandbox).args(["delete", "Bravo"]).assert().failure();
}
