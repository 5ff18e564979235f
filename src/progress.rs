use std::cell::Cell;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// Human-facing progress lines on stderr, prefixed with elapsed time.
pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
    written: Cell<usize>,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
            written: Cell::new(0),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let stamp = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let _ = writeln!(io::stderr().lock(), "[{stamp}] {}", msg.as_ref());
    }

    /// One line per file written, e.g. `HTML: out/resume.html`.
    pub fn artifact(&self, kind: &str, path: &Path) {
        self.written.set(self.written.get() + 1);
        self.info(format!("{kind}: {}", path.display()));
    }

    pub fn written(&self) -> usize {
        self.written.get()
    }

    pub fn done(&self) {
        let n = self.written();
        let files = if n == 1 { "file" } else { "files" };
        self.info(format!(
            "Done: {n} {files} in {:.1}s",
            self.t0.elapsed().as_secs_f64()
        ));
    }
}

fn fmt_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, total / 60 % 60, total % 60);
    if h == 0 {
        format!("{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_format() {
        assert_eq!(fmt_elapsed(0.4), "00:00");
        assert_eq!(fmt_elapsed(75.0), "01:15");
        assert_eq!(fmt_elapsed(3723.0), "01:02:03");
        assert_eq!(fmt_elapsed(-1.0), "00:00");
    }

    #[test]
    fn counts_artifacts_even_when_quiet() {
        let p = ConsoleProgress::new(false);
        p.artifact("HTML", Path::new("resume.html"));
        p.artifact("PDF", Path::new("resume.pdf"));
        assert_eq!(p.written(), 2);
    }
}
