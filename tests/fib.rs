use std::{error::Error, path::Path};

use test_utils::{check_run, check_run_vm, Expected};

const SRC_PATH: &str = "./fixtures/fib.cact";
const EXPECTED: Expected = Expected {
    stdout: "55\n",
    stderr: "",
};

#[test]
fn interpret_fib() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

#[test]
fn run_fib_on_vm() -> Result<(), Box<dyn Error>> {
    check_run_vm(
        Path::new(SRC_PATH),
        Expected {
            stdout: "55\n",
            stderr: "",
        },
    )
}
