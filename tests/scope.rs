use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/scope.cact";
const EXPECTED: Expected = Expected {
    stdout: "inner\nouter\nif-block\nouter\n",
    stderr: "",
};

#[test]
fn run_scope() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
