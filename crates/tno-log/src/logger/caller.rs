/// Shorten a caller for display: keep the last segment of a qualified
/// function or module name and the last component of a source path.
///
/// `("pkg_log.New.func1", "/src/pkg/log/log.go")` becomes `("func1", "log.go")`,
/// `("tno_log::logger::log", "crates/tno-log/src/logger/log.rs")` becomes `("log", "log.rs")`.
pub fn prettify<'a>(function: &'a str, file: &'a str) -> (&'a str, &'a str) {
    (last_segment(function), file_name(file))
}

fn last_segment(function: &str) -> &str {
    function
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .unwrap_or(function)
}

fn file_name(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::prettify;

    #[test]
    fn strips_package_and_directories() {
        assert_eq!(
            prettify("pkg_log.New.func1", "/src/pkg/log/log.go"),
            ("func1", "log.go")
        );
    }

    #[test]
    fn strips_rust_module_paths() {
        assert_eq!(
            prettify("tno_log::logger::log", "crates/tno-log/src/logger/log.rs"),
            ("log", "log.rs")
        );
    }

    #[test]
    fn handles_windows_paths() {
        assert_eq!(prettify("main", r"C:\src\main.rs"), ("main", "main.rs"));
    }

    #[test]
    fn unqualified_input_is_unchanged() {
        assert_eq!(prettify("main", "main.rs"), ("main", "main.rs"));
        assert_eq!(prettify("", ""), ("", ""));
    }
}
