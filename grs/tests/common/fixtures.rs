use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// A fake devbox home rooted in one temp dir: managed-dirs list, shim
/// config, project directories, and (optionally) a scripted git binary.
pub struct ShimFixture {
    _home: TempDir,
    pub home_path: PathBuf,
    pub config_path: PathBuf,
    pub managed_dirs: PathBuf,
}

impl ShimFixture {
    pub fn new() -> Self {
        crate::test_log!("FIXTURE: Creating shim home");

        let home = TempDir::new().expect("Failed to create temp home");
        // Canonicalize so textual prefix matching agrees with the cwd the
        // shim process observes (tmpdirs sit behind symlinks on macOS).
        let home_path = home.path().canonicalize().expect("Failed to canonicalize home");

        let managed_dirs = home_path.join(".devbox").join("managed_dirs");
        fs::create_dir_all(managed_dirs.parent().unwrap()).expect("Failed to create .devbox");
        fs::write(&managed_dirs, "").expect("Failed to write managed_dirs");

        let config_path = home_path.join("config.toml");

        Self {
            _home: home,
            home_path,
            config_path,
            managed_dirs,
        }
    }

    /// Write the shim config pointing at the given proxy port and real git.
    pub fn write_config(&self, port: u16, real_git: &Path) {
        let config = format!(
            r#"[proxy]
host = "127.0.0.1"
port = {port}

[git]
real_binary = "{real_git}"

[sync]
managed_dirs_file = "{managed}"
"#,
            real_git = real_git.display(),
            managed = self.managed_dirs.display(),
        );
        fs::write(&self.config_path, config).expect("Failed to write config");
    }

    /// Append a directory to the managed list.
    pub fn manage(&self, dir: &Path) {
        let mut content = fs::read_to_string(&self.managed_dirs).unwrap_or_default();
        content.push_str(&format!("{}\n", dir.display()));
        fs::write(&self.managed_dirs, content).expect("Failed to update managed_dirs");
    }

    /// Create a project directory under the fixture home.
    pub fn project_dir(&self, rel: &str) -> PathBuf {
        let dir = self.home_path.join(rel);
        fs::create_dir_all(&dir).expect("Failed to create project dir");
        dir
    }

    /// Write an executable shell script standing in for the real git.
    #[cfg(unix)]
    pub fn fake_git(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.home_path.join("fake-git");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake git");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake git");
        path
    }

    /// Build a command for the shim binary with the fixture environment.
    pub fn command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_grs"));
        cmd.env("HOME", &self.home_path)
            .env("GRS_CONFIG", &self.config_path)
            .env_remove("GRS_LOG");
        cmd
    }
}

/// A scripted stand-in for the proxy daemon: accepts one connection,
/// captures the request line, replies with fixed frames, closes.
pub struct FakeProxy {
    pub port: u16,
    request_rx: mpsc::Receiver<String>,
    handle: thread::JoinHandle<()>,
}

impl FakeProxy {
    pub fn spawn(frames: &[&str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake proxy");
        let port = listener.local_addr().unwrap().port();
        let frames: Vec<String> = frames.iter().map(|s| s.to_string()).collect();
        let (tx, request_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Fake proxy accept failed");
            let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
            let mut line = String::new();
            reader.read_line(&mut line).expect("Failed to read request");
            let _ = tx.send(line);
            for frame in frames {
                // The shim may close the socket after the terminal frame;
                // later writes failing is expected.
                if writeln!(stream, "{frame}").is_err() {
                    break;
                }
            }
        });

        Self {
            port,
            request_rx,
            handle,
        }
    }

    /// Wait for the server to finish and return the raw request line.
    pub fn request(self) -> String {
        let line = self
            .request_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("Fake proxy saw no request");
        let _ = self.handle.join();
        line
    }
}

/// Bind and immediately drop a listener so the port refuses connections.
pub fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().unwrap().port()
}
