use std::{error::Error, path::Path};

use test_utils::{check_run, check_run_vm, Expected};

const SRC_PATH: &str = "./fixtures/expressions.cact";
const EXPECTED: Expected = Expected {
    stdout: "7\n9\n1024\n1\n",
    stderr: "",
};

#[test]
fn run_expressions() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

#[test]
fn run_expressions_on_vm() -> Result<(), Box<dyn Error>> {
    check_run_vm(
        Path::new(SRC_PATH),
        Expected {
            stdout: "7\n9\n1024\n1\n",
            stderr: "",
        },
    )
}
