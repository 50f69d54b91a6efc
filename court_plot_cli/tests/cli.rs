use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn court_command_writes_png() {
    let dir = assert_fs::TempDir::new().unwrap();
    let out = dir.child("court.png");

    Command::cargo_bin("court_plot_cli")
        .unwrap()
        .args([
            "court",
            "--out",
            out.path().to_str().unwrap(),
            "--width",
            "320",
            "--height",
            "240",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    out.assert(predicate::path::exists());
    dir.close().unwrap();
}

#[test]
fn court_command_rejects_unknown_color() {
    Command::cargo_bin("court_plot_cli")
        .unwrap()
        .args(["court", "--court-color", "no-such-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown color"));
}

#[test]
fn serve_map_reports_missing_font() {
    let dir = assert_fs::TempDir::new().unwrap();
    let pbp = dir.child("pbp.csv");
    pbp.write_str(
        "point_ID,server_id,serve_num,error_type,x_serve_bounce,y_serve_bounce,court_side,is_ace\n\
         1,9801,1,,6.1,2.2,DeuceCourt,0\n",
    )
    .unwrap();
    let tracking = dir.child("tracking.csv");
    tracking.write_str("point_ID,seq,x,y,z\n").unwrap();

    Command::cargo_bin("court_plot_cli")
        .unwrap()
        .args([
            "serve-map",
            "--pbp",
            pbp.path().to_str().unwrap(),
            "--tracking",
            tracking.path().to_str().unwrap(),
            "--server-id",
            "9801",
            "--font",
            dir.child("missing.ttf").path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));

    dir.close().unwrap();
}

#[test]
fn serve_map_rejects_malformed_table() {
    let dir = assert_fs::TempDir::new().unwrap();
    let pbp = dir.child("pbp.csv");
    pbp.write_str("point_ID,server_id\n1,9801\n").unwrap();
    let tracking = dir.child("tracking.csv");
    tracking.write_str("point_ID,seq,x,y,z\n").unwrap();

    Command::cargo_bin("court_plot_cli")
        .unwrap()
        .args([
            "serve-map",
            "--pbp",
            pbp.path().to_str().unwrap(),
            "--tracking",
            tracking.path().to_str().unwrap(),
            "--server-id",
            "9801",
            "--font",
            "unused.ttf",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("serve_num"));

    dir.close().unwrap();
}
