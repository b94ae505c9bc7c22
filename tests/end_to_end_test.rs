use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipArchive;

const DEFAULT_INPUT: &str = "problems_data.json";
const DEFAULT_OUTPUT: &str = "수학_문제_슬라이드_결과.pptx";

fn run_command(dir: &Path, args: &[&str]) -> Output {
    run_command_with_env(dir, args, &[])
}

fn run_command_with_env(dir: &Path, args: &[&str], envs: &[(&str, &Path)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_quiz-slides"));
    command
        .args(args)
        .current_dir(dir)
        .env_remove("QUIZ_SLIDES_INPUT")
        .env_remove("QUIZ_SLIDES_OUTPUT")
        .env_remove("QUIZ_SLIDES_IMAGE_DIR")
        .env_remove("RUST_LOG");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute command")
}

fn write_square_picture(dir: &Path, name: &str) {
    let picture = image::ImageBuffer::from_fn(50, 50, |_, _| image::Rgb([0u8, 255u8, 0u8]));
    picture.save(dir.join(name)).expect("Failed to save image");
}

fn count_slides(pptx: &Path) -> usize {
    let file = fs::File::open(pptx).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .count()
}

#[test]
fn test_missing_input_exits_with_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_command(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1), "Expected exit code 1: {:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(DEFAULT_INPUT), "stderr: {}", stderr);
    assert!(!temp_dir.path().join(DEFAULT_OUTPUT).exists());
}

#[test]
fn test_empty_input_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join(DEFAULT_INPUT), "[]").expect("Failed to write input");

    let output = run_command(temp_dir.path(), &[]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no problem data"), "stdout: {}", stdout);
    assert!(!temp_dir.path().join(DEFAULT_OUTPUT).exists());
}

#[test]
fn test_invalid_json_exits_with_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join(DEFAULT_INPUT), "{ not json").expect("Failed to write input");

    let output = run_command(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join(DEFAULT_OUTPUT).exists());
}

#[test]
fn test_default_paths_with_missing_picture() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = r#"[{"number":"1","slide_title":"Algebra","question":"Solve x+1=2","choices":["A) 1","B) 2"],"included_picture":"missing.png"}]"#;
    fs::write(temp_dir.path().join(DEFAULT_INPUT), input).expect("Failed to write input");

    let output = run_command(temp_dir.path(), &[]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warning"), "stdout: {}", stdout);
    assert!(stdout.contains("missing.png"), "stdout: {}", stdout);
    assert!(stdout.contains("Slide 1 created: problem 1"), "stdout: {}", stdout);
    // Warnings are logged to stderr at the default level as well
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.png"), "stderr: {}", stderr);

    let pptx = temp_dir.path().join(DEFAULT_OUTPUT);
    assert!(pptx.exists(), "PPTX file was not created");
    assert_eq!(count_slides(&pptx), 1);
}

#[test]
fn test_explicit_paths_and_image_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let images = temp_dir.path().join("images");
    fs::create_dir(&images).expect("Failed to create image dir");
    write_square_picture(&images, "square.png");

    let input_path = temp_dir.path().join("set.json");
    fs::write(
        &input_path,
        r#"[{"number":"1","question":"?","included_picture":"square.png"},{"number":"2"}]"#,
    )
    .expect("Failed to write input");
    let output_path = temp_dir.path().join("out").join("quiz.pptx");

    let output = run_command(
        temp_dir.path(),
        &[
            "-i",
            input_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
            "--image-dir",
            images.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Warning"), "stdout: {}", stdout);
    assert!(output_path.exists());
    assert_eq!(count_slides(&output_path), 2);

    let file = fs::File::open(&output_path).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    assert!(archive.by_name("ppt/media/image1.png").is_ok());
}

#[test]
fn test_environment_selects_paths() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let images = temp_dir.path().join("images");
    fs::create_dir(&images).expect("Failed to create image dir");
    write_square_picture(&images, "square.png");

    let input_path = temp_dir.path().join("from_env.json");
    fs::write(
        &input_path,
        r#"[{"number":"1","question":"?","included_picture":"square.png"}]"#,
    )
    .expect("Failed to write input");
    let output_path = temp_dir.path().join("from_env.pptx");

    let output = run_command_with_env(
        temp_dir.path(),
        &[],
        &[
            ("QUIZ_SLIDES_INPUT", input_path.as_path()),
            ("QUIZ_SLIDES_OUTPUT", output_path.as_path()),
            ("QUIZ_SLIDES_IMAGE_DIR", images.as_path()),
        ],
    );

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Warning"), "stdout: {}", stdout);
    assert!(output_path.exists());
    assert!(!temp_dir.path().join(DEFAULT_OUTPUT).exists());

    let file = fs::File::open(&output_path).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    assert!(archive.by_name("ppt/media/image1.png").is_ok());
}

#[test]
fn test_flags_override_environment() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let flag_images = temp_dir.path().join("flag_images");
    fs::create_dir(&flag_images).expect("Failed to create image dir");
    write_square_picture(&flag_images, "square.png");
    let env_images = temp_dir.path().join("env_images");
    fs::create_dir(&env_images).expect("Failed to create image dir");

    let input_path = temp_dir.path().join("flag.json");
    fs::write(
        &input_path,
        r#"[{"number":"1","question":"?","included_picture":"square.png"}]"#,
    )
    .expect("Failed to write input");
    let env_output = temp_dir.path().join("env.pptx");
    let flag_output = temp_dir.path().join("flag.pptx");

    let output = run_command_with_env(
        temp_dir.path(),
        &[
            "-i",
            input_path.to_str().unwrap(),
            "-o",
            flag_output.to_str().unwrap(),
            "--image-dir",
            flag_images.to_str().unwrap(),
        ],
        &[
            ("QUIZ_SLIDES_INPUT", temp_dir.path().join("absent.json").as_path()),
            ("QUIZ_SLIDES_OUTPUT", env_output.as_path()),
            ("QUIZ_SLIDES_IMAGE_DIR", env_images.as_path()),
        ],
    );

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Warning"), "stdout: {}", stdout);
    assert!(flag_output.exists());
    assert!(!env_output.exists());
}

#[test]
fn test_progress_is_printed_before_a_failed_write() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = r#"[{"number":"1","question":"?","included_picture":"missing.png"},{"number":"2"}]"#;
    fs::write(temp_dir.path().join(DEFAULT_INPUT), input).expect("Failed to write input");
    fs::write(temp_dir.path().join("blocker"), "not a directory").expect("Failed to write file");

    let output = run_command(temp_dir.path(), &["-o", "blocker/out.pptx"]);

    assert_eq!(output.status.code(), Some(1), "Expected exit code 1: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generating 2 slides"), "stdout: {}", stdout);
    assert!(stdout.contains("missing.png"), "stdout: {}", stdout);
    assert!(stdout.contains("Slide 1 created: problem 1"), "stdout: {}", stdout);
    assert!(stdout.contains("Slide 2 created: problem 2"), "stdout: {}", stdout);
    assert!(!stdout.contains("Successfully wrote"), "stdout: {}", stdout);
}
