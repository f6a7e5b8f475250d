//! In-process stand-ins for the fetch tool.
//!
//! `FixtureFetcher` writes a fixed set of files under `<output_dir>/<host>`,
//! skipping files that already exist, the way a no-clobber mirror does.
//! `fake_wget` writes a shell script that behaves like wget at the process boundary.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use sitexport_core::fetch::Fetcher;
use sitexport_core::site_url::OriginUrl;
use sitexport_core::ExportError;

pub const ORIGIN: &str = "http://project-gorbachev.local";
pub const TARGET: &str = "https://airbornesurfer.com/project-gorbachev";

/// Windows-1252 reading of the UTF-8 bytes of an em dash.
pub const EM_DASH_MOJIBAKE: &str = "\u{e2}\u{20ac}\u{201d}";
/// Windows-1252 reading of the UTF-8 bytes of a right single quote.
pub const APOSTROPHE_MOJIBAKE: &str = "\u{e2}\u{20ac}\u{2122}";

pub struct FixtureFetcher {
    files: Vec<(String, Vec<u8>)>,
    pub calls: AtomicUsize,
}

impl FixtureFetcher {
    pub fn new(files: Vec<(&str, Vec<u8>)>) -> Self {
        FixtureFetcher {
            files: files
                .into_iter()
                .map(|(p, b)| (p.to_string(), b))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Fetcher for FixtureFetcher {
    fn fetch(&self, origin: &OriginUrl, output_dir: &Path) -> Result<(), ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let root = output_dir.join(origin.host());
        for (rel, bytes) in &self.files {
            let path = root.join(rel);
            if path.exists() {
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, bytes).unwrap();
        }
        Ok(())
    }
}

/// Fetcher that always fails the way a crashed crawl does.
pub struct FailingFetcher;

impl Fetcher for FailingFetcher {
    fn fetch(&self, _: &OriginUrl, _: &Path) -> Result<(), ExportError> {
        Err(ExportError::FetchFailure { status: Some(8) })
    }
}

/// A small CMS-like site referencing its own origin everywhere.
pub fn cms_site() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        (
            "index.html",
            format!(
                "<html><head><link rel=\"stylesheet\" href=\"{ORIGIN}/wp-content/style.css\">\n\
                 <script src=\"{ORIGIN}/wp-includes/js/app.js\"></script></head>\n\
                 <body><a href=\"{ORIGIN}/about/\">About</a>\n\
                 <p>Drafted {EM_DASH_MOJIBAKE} then published. It{APOSTROPHE_MOJIBAKE}s live.</p>\n\
                 </body></html>"
            )
            .into_bytes(),
        ),
        (
            "about/index.html",
            format!("<a href=\"{ORIGIN}/\">Home</a> <a href=\"../index.html\">Back</a>")
                .into_bytes(),
        ),
        (
            "wp-content/style.css",
            format!(
                "a{{background:url({ORIGIN}/img/a.png)}}\n\
                 b{{background:url({ORIGIN}/img/b.png)}}\n\
                 c{{background:url({ORIGIN}/img/c.png)}}\n\
                 d{{background:url({ORIGIN}.other/img/d.png)}}"
            )
            .into_bytes(),
        ),
        (
            "wp-includes/js/app.js",
            format!("var base = \"{ORIGIN}\";\nvar api = base + \"/wp-json\";").into_bytes(),
        ),
        (
            "wp-includes/js/jquery.min.js@ver=3.7.1",
            format!("/* {ORIGIN}/wp-includes/js/jquery.min.js */").into_bytes(),
        ),
        (
            "sitemap.xml",
            format!("<urlset><url><loc>{ORIGIN}/about/</loc></url></urlset>").into_bytes(),
        ),
        (
            "legacy.htm",
            format!("<a href=\"{ORIGIN}/old\">Old {EM_DASH_MOJIBAKE} page</a>").into_bytes(),
        ),
        (
            "img/logo.png",
            [&[0x89, b'P', b'N', b'G', 0x00, 0xFF][..], ORIGIN.as_bytes()].concat(),
        ),
        ("feed.json", format!("{{\"home\":\"{ORIGIN}\"}}").into_bytes()),
    ]
}

/// Writes an executable script standing in for wget. It creates
/// `<prefix>/<host_dir>/index.html` with `body` and exits with `exit_code`.
#[cfg(unix)]
pub fn fake_wget(dir: &Path, host_dir: &str, body: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n\
         out=.\n\
         for arg in \"$@\"; do\n\
         \tcase \"$arg\" in\n\
         \t\t--directory-prefix=*) out=\"${{arg#--directory-prefix=}}\" ;;\n\
         \tesac\n\
         done\n\
         mkdir -p \"$out/{host_dir}\"\n\
         printf '%s' '{body}' > \"$out/{host_dir}/index.html\"\n\
         printf '%s\\n' \"$@\" > \"$out/args.txt\"\n\
         exit {exit_code}\n"
    );
    let path = dir.join("fake-wget");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
