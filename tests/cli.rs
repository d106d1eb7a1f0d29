use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn julia() -> Command {
    Command::cargo_bin("julia").unwrap()
}

#[test]
fn writes_an_image_of_the_requested_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("small.png");
    julia()
        .arg("-o")
        .arg(&path)
        .args(&["-s", "32x24", "-g", "2", "-i", "50", "-t", "2"])
        .assert()
        .success();
    let image = image::open(&path).unwrap().to_rgba();
    assert_eq!((image.width(), image.height()), (32, 24));
    assert!(image.into_raw().chunks(4).all(|pixel| pixel[3] == 255));
}

#[test]
fn accepts_negative_corners_and_parameters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corners.png");
    julia()
        .arg("-o")
        .arg(&path)
        .args(&[
            "-s",
            "16x16",
            "--leftlower=-2.0,-2.0",
            "--rightupper=2.0,2.0",
            "--parameter=-0.4,0.6",
            "-i",
            "40",
        ])
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn refuses_an_empty_sample_grid() {
    let dir = tempdir().unwrap();
    julia()
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .args(&["-g", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sample grid width must be between 1 and 16"));
    assert!(!dir.path().join("never.png").exists());
}

#[test]
fn refuses_an_inverted_viewport() {
    let dir = tempdir().unwrap();
    julia()
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .args(&["-s", "8x8", "--leftlower=1.0,1.0", "--rightupper=-1.0,-1.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid viewport"));
}

#[test]
fn refuses_an_unbounded_viewport() {
    let dir = tempdir().unwrap();
    julia()
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .args(&["-s", "8x8", "--leftlower=-inf,-1.0", "-i", "20"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid viewport"));
    assert!(!dir.path().join("never.png").exists());
}

#[test]
fn writes_png_when_the_output_has_no_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fractal");
    julia()
        .arg("-o")
        .arg(&path)
        .args(&["-s", "12x8", "-g", "1", "-i", "20"])
        .assert()
        .success();
    let bytes = std::fs::read(&path).unwrap();
    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::PNG)
        .unwrap()
        .to_rgba();
    assert_eq!((image.width(), image.height()), (12, 8));
}

#[test]
fn refuses_a_zero_sized_image() {
    let dir = tempdir().unwrap();
    julia()
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .args(&["-s", "0x10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has no area"));
}

#[test]
fn reports_unwritable_destinations() {
    let dir = tempdir().unwrap();
    julia()
        .arg("-o")
        .arg(dir.path().join("missing").join("julia.png"))
        .args(&["-s", "8x8", "-i", "20"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not export frame"));
}

#[test]
fn previews_on_the_terminal() {
    let output = julia()
        .args(&["-p", "--preview-size", "6x4", "--preview-grid", "1", "-i", "20"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    // Two pixel rows per line of text.
    assert_eq!(text.lines().count(), 2);
    assert_eq!(text.matches('\u{2580}').count(), 6 * 2);
}
