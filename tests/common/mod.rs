#![allow(dead_code)]

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use assert_fs::{prelude::*, TempDir};
use plugin_shell::Session;

/// Creates a temporary plugin directory holding `files`.
pub fn plugin_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create plugin dir");
    for (name, contents) in files {
        dir.child(name).write_str(contents).expect("write plugin file");
    }
    dir
}

/// Output sink that keeps everything written to it for later inspection.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub const ARITHMETIC: &str = r#"
title = "arithmetic helpers"

[[command]]
name = "add"
description = "Add numbers"
procedure = { template = "$1 + $2" }

[[command]]
name = "internal"
procedure = "echo"
"#;

pub const ECHO: &str = r#"
[[command]]
name = "echo"
description = "Print the arguments"
usage = "echo <words...>"
procedure = "echo"
"#;
