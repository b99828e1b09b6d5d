use std::{
	fs,
	path::PathBuf,
	process::Command,
	time::{SystemTime, UNIX_EPOCH},
};

fn create_temp_dir(label: &str) -> PathBuf {
	let stamp = SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock.").as_nanos();
	let root = std::env::temp_dir().join(format!("callstyle-{label}-{stamp}"));
	let _ = fs::remove_dir_all(&root);

	fs::create_dir_all(&root).expect("Create temp dir.");

	root
}

#[test]
fn check_reports_violations_without_touching_the_file() {
	let temp_dir = create_temp_dir("check-never");
	let source = "foo ();\n";
	let file = temp_dir.join("app.js");

	fs::write(&file, source).expect("write fixture");

	let output = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.arg("check")
		.arg(&file)
		.output()
		.expect("run callstyle");

	assert!(!output.status.success());
	assert_eq!(fs::read_to_string(&file).expect("read fixture back"), source);

	let stdout = String::from_utf8_lossy(&output.stdout);

	assert!(stdout.contains("JS-CALL-SPACE-001"));
	assert!(stdout.contains("Checked 1 file(s)."));
}

#[test]
fn always_mode_requires_a_space_and_fix_inserts_it() {
	let temp_dir = create_temp_dir("check-always");
	let file = temp_dir.join("app.js");

	fs::write(&file, "foo();\n").expect("write fixture");

	let check = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.args(["check", "--mode", "always"])
		.arg(&file)
		.output()
		.expect("run callstyle check");

	assert!(!check.status.success());
	assert!(String::from_utf8_lossy(&check.stdout).contains("JS-CALL-SPACE-003"));

	let fix = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.args(["fix", "--mode", "always"])
		.arg(&file)
		.output()
		.expect("run callstyle fix");

	assert!(fix.status.success());
	assert_eq!(fs::read_to_string(&file).expect("read fixture back"), "foo ();\n");
}

#[test]
fn allow_newlines_accepts_multiline_call_gaps() {
	let temp_dir = create_temp_dir("check-newlines");
	let file = temp_dir.join("app.js");

	fs::write(&file, "foo\n();\n").expect("write fixture");

	let strict = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.args(["check", "--mode", "always"])
		.arg(&file)
		.output()
		.expect("run callstyle");

	assert!(!strict.status.success());
	assert!(String::from_utf8_lossy(&strict.stdout).contains("JS-CALL-SPACE-002"));

	let relaxed = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.args(["check", "--mode", "always", "--allow-newlines"])
		.arg(&file)
		.output()
		.expect("run callstyle");

	assert!(relaxed.status.success());
}

#[test]
fn coverage_lists_every_rule_id() {
	let output = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.arg("coverage")
		.output()
		.expect("run callstyle");

	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);

	for rule in ["JS-CALL-SPACE-001", "JS-CALL-SPACE-002", "JS-CALL-SPACE-003"] {
		assert!(stdout.contains(rule));
	}
}
