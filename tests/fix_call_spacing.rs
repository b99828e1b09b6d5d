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
fn fix_rewrites_fixable_gaps_and_exits_cleanly() {
	let temp_dir = create_temp_dir("fix-clean");
	let source = "foo ();\nconst a = new Thing (1);\nimport ('mod');\nbar?. ();\n";
	let file = temp_dir.join("app.js");

	fs::write(&file, source).expect("write fixture");

	let output = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.arg("fix")
		.arg(&file)
		.output()
		.expect("run callstyle");

	assert!(output.status.success());

	let rewritten = fs::read_to_string(&file).expect("read fixture back");

	assert_eq!(rewritten, "foo();\nconst a = new Thing(1);\nimport('mod');\nbar?.();\n");

	let stdout = String::from_utf8_lossy(&output.stdout);

	assert!(stdout.contains("Applied 4 fix(es)."));
}

#[test]
fn fix_leaves_unfixable_gaps_alone_and_fails() {
	let temp_dir = create_temp_dir("fix-manual");
	let source = "foo\n();\nbar /* keep me */ ();\n";
	let file = temp_dir.join("app.js");

	fs::write(&file, source).expect("write fixture");

	let output = Command::new(env!("CARGO_BIN_EXE_callstyle"))
		.arg("fix")
		.arg(&file)
		.output()
		.expect("run callstyle");

	assert!(!output.status.success());
	assert_eq!(fs::read_to_string(&file).expect("read fixture back"), source);

	let stdout = String::from_utf8_lossy(&output.stdout);

	assert!(stdout.contains("2 violation(s) require manual fixes."));

	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(stderr.contains("Found 2 remaining call spacing violation(s) after fix."));
}
