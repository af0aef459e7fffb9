use std::{error::Error, path::Path};

use test_utils::{check_failing_vm, check_run, Expected};

const SRC_PATH: &str = "./fixtures/methods.cact";
const EXPECTED: Expected = Expected {
    stdout: "[1, 2, 3]\nHello Rust\ntrue\nHello World\ntrue\nfalse\n",
    stderr: "",
};

#[test]
fn run_methods() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

#[test]
fn method_calls_are_rejected_by_the_vm() -> Result<(), Box<dyn Error>> {
    check_failing_vm(Path::new(SRC_PATH))
}
