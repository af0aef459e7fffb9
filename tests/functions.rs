use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/functions.cact";
const EXPECTED: Expected = Expected {
    stdout: "Hello, World!\nHey, Rust!\n7\n",
    stderr: "",
};

#[test]
fn run_functions() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
