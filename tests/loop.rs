use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/loop.cact";
const EXPECTED: Expected = Expected {
    stdout: "01234\n56789\n",
    stderr: "",
};

#[test]
fn run_loop() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
