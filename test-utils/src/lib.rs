use std::{
    error::Error,
    io,
    path::Path,
    process::{Command, Output},
    str,
};

const CACTUS_PATH: &str = "./target/debug/cactus";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_script(src_path: &Path, extra_args: &[&str]) -> Result<Output, io::Error> {
    Command::new(CACTUS_PATH).args(extra_args).arg(src_path).output()
}

/// Runs a `.cact` fixture through the tree-walking interpreter and checks
/// stdout/stderr match exactly.
pub fn check_run(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_script(src_path, &[])?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "cactus exited with status {:?}",
        output.status.code()
    );
    Ok(())
}

/// Runs a `.cact` fixture through the bytecode VM and checks stdout/stderr
/// match exactly — used to assert both backends agree on the shared subset.
pub fn check_run_vm(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_script(src_path, &["--vm"])?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "cactus --vm exited with status {:?}",
        output.status.code()
    );
    Ok(())
}

/// Runs a fixture expected to fail (lex/parse/runtime error) and asserts a
/// non-zero exit code.
pub fn check_failing(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = run_script(src_path, &[])?;
    assert!(
        !output.status.success(),
        "cactus should have exited with a non-zero status for {}",
        src_path.display()
    );
    Ok(())
}

/// Runs a fixture through the bytecode VM expecting a compile error (e.g. a
/// construct outside the VM's documented subset) and asserts a non-zero
/// exit code.
pub fn check_failing_vm(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = run_script(src_path, &["--vm"])?;
    assert!(
        !output.status.success(),
        "cactus --vm should have exited with a non-zero status for {}",
        src_path.display()
    );
    Ok(())
}
