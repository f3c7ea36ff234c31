//! ## a2kit subprocess
//!
//! Runs `a2kit` once per request with the disk image piped to stdin.
//! Stdin is fed from its own thread, and stdout/stderr are drained from their own
//! threads, so a large image or a large response cannot deadlock the pipe.
//! The child is killed if it does not finish within the timeout.

use std::io::{Read,Write};
use std::path::PathBuf;
use std::process::{Command,Stdio};
use std::thread;
use std::time::{Duration,Instant};
use log::{trace,debug,warn,error};
use super::{DiskBackend,Error,Method};
use crate::DYNERR;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(5);
/// lowest compatible version, inclusive
const MIN_VERSION: [u64;3] = [4,0,0];
/// highest compatible version, exclusive
const MAX_VERSION: [u64;3] = [5,0,0];

fn exe_name() -> &'static str {
    if cfg!(windows) {
        "a2kit.exe"
    } else {
        "a2kit"
    }
}

/// Drain a pipe on a separate thread
fn drain<R: Read + Send + 'static>(maybe_pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = maybe_pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                debug!("pipe closed early: {}",e);
            }
        }
        buf
    })
}

/// A disk image mounted through the `a2kit` executable
pub struct A2kitProcess {
    exe: PathBuf,
    img: Vec<u8>,
    method: Option<Method>,
    pro: Option<String>,
    timeout: Duration
}

impl A2kitProcess {
    /// Mount the image bytes using the executable at `exe`
    pub fn new(exe: PathBuf,img: Vec<u8>) -> Self {
        Self {
            exe,
            img,
            method: None,
            pro: None,
            timeout: DEFAULT_TIMEOUT
        }
    }
    /// Pass `--method` with every image request
    pub fn with_method(mut self,method: Method) -> Self {
        self.method = Some(method);
        self
    }
    /// Pass `--pro` with every image request, `fmt_path` points to a JSON track format
    pub fn with_pro(mut self,fmt_path: &str) -> Self {
        self.pro = Some(fmt_path.to_string());
        self
    }
    /// Kill the child if it runs longer than `timeout`
    pub fn with_timeout(mut self,timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    /// Find the backend executable.  An explicit path is used or rejected outright,
    /// otherwise the candidates in order are the `A2KIT_PATH` environment variable,
    /// a bundled copy in `server/<os>-<arch>` beside our own executable, and the
    /// cargo install directory.
    pub fn locate(explicit: Option<&str>) -> Result<PathBuf,Error> {
        if let Some(path) = explicit {
            let path = PathBuf::from(path);
            if path.is_file() {
                debug!("using backend {}",path.display());
                return Ok(path);
            }
            error!("backend path {} does not exist",path.display());
            return Err(Error::NotFound);
        }
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Ok(path) = std::env::var("A2KIT_PATH") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(me) = std::env::current_exe() {
            if let Some(dir) = me.parent() {
                let target = [std::env::consts::OS,"-",std::env::consts::ARCH].concat();
                candidates.push(dir.join("server").join(target).join(exe_name()));
            }
        }
        if let Some(home) = std::env::var_os("HOME").or(std::env::var_os("USERPROFILE")) {
            candidates.push(PathBuf::from(home).join(".cargo").join("bin").join(exe_name()));
        }
        for path in candidates {
            if path.is_file() {
                debug!("using backend {}",path.display());
                return Ok(path);
            }
            trace!("no backend at {}",path.display());
        }
        warn!("a2kit not found, try `--backend` or set A2KIT_PATH");
        Err(Error::NotFound)
    }
    fn spawn(&self,args: &[String],stdin: Option<&[u8]>) -> Result<Vec<u8>,DYNERR> {
        trace!("spawning {} {}",self.exe.display(),args.join(" "));
        let mut child = match Command::new(&self.exe)
            .args(args)
            .stdin(match stdin { Some(_) => Stdio::piped(), None => Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn() {
            Ok(c) => c,
            Err(e) => {
                error!("{}",e);
                return Err(Box::new(Error::Spawn));
            }
        };
        let writer = match (child.stdin.take(),stdin) {
            (Some(mut pipe),Some(dat)) => {
                let dat = dat.to_vec();
                Some(thread::spawn(move || {
                    // the child may legitimately exit without reading everything
                    if let Err(e) = pipe.write_all(&dat) {
                        debug!("stdin closed early: {}",e);
                    }
                }))
            },
            _ => None
        };
        let out_reader = drain(child.stdout.take());
        let err_reader = drain(child.stderr.take());
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    error!("a2kit timed out after {:?}",self.timeout);
                    child.kill()?;
                    child.wait()?;
                    return Err(Box::new(Error::Timeout));
                },
                None => thread::sleep(POLL_INTERVAL)
            }
        };
        if let Some(handle) = writer {
            let _ = handle.join();
        }
        let stdout = out_reader.join().unwrap_or_default();
        let stderr = err_reader.join().unwrap_or_default();
        if !status.success() {
            let msg = String::from_utf8_lossy(&stderr).trim().to_string();
            debug!("a2kit exited with {}",status);
            return match msg.len() {
                0 => Err(Box::new(Error::Spawn)),
                _ => Err(Box::new(Error::Backend(msg)))
            };
        }
        Ok(stdout)
    }
    fn image_args(&self,args: &[&str]) -> Vec<String> {
        let mut ans: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        if let Some(fmt) = &self.pro {
            ans.push("--pro".to_string());
            ans.push(fmt.to_string());
        }
        if let Some(method) = &self.method {
            ans.push("--method".to_string());
            ans.push(method.to_string());
        }
        ans
    }
    /// Run a2kit on the mounted image expecting binary output
    pub fn bin2bin(&self,args: &[&str]) -> Result<Vec<u8>,DYNERR> {
        self.spawn(&self.image_args(args),Some(&self.img))
    }
    /// Run a2kit on the mounted image expecting text output
    pub fn bin2txt(&self,args: &[&str]) -> Result<String,DYNERR> {
        let bytes = self.bin2bin(args)?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }
    /// Get the backend version as [major,minor,patch]
    pub fn version(&self) -> Result<[u64;3],DYNERR> {
        let raw = self.spawn(&["-V".to_string()],None)?;
        let vers_str = String::from_utf8_lossy(&raw).to_string();
        let patt = regex::Regex::new(r"a2kit ([0-9]+)\.([0-9]+)\.([0-9]+)")?;
        match patt.captures(&vers_str) {
            Some(caps) => Ok([caps[1].parse()?,caps[2].parse()?,caps[3].parse()?]),
            None => {
                error!("could not parse version string {}",vers_str.trim());
                Err(Box::new(Error::IncompatibleVersion(vers_str.trim().to_string())))
            }
        }
    }
    /// Get the backend version, and verify it is 4.x
    pub fn check_version(&self) -> Result<[u64;3],DYNERR> {
        let v = self.version()?;
        if v < MIN_VERSION || v >= MAX_VERSION {
            let msg = format!("a2kit 4.x is expected, found {}.{}.{}",v[0],v[1],v[2]);
            return Err(Box::new(Error::IncompatibleVersion(msg)));
        }
        debug!("backend version {}.{}.{}",v[0],v[1],v[2]);
        Ok(v)
    }
}

impl DiskBackend for A2kitProcess {
    fn read_metadata(&mut self) -> Result<String,DYNERR> {
        self.bin2txt(&["get","-t","meta"])
    }
    fn read_sector(&mut self,cyl: usize,head: usize,sec: usize) -> Result<Vec<u8>,DYNERR> {
        self.bin2bin(&["get","-t","sec","-f",&format!("{},{},{}",cyl,head,sec)])
    }
    fn read_sectors(&mut self,secs: &[[usize;3]]) -> Result<Vec<u8>,DYNERR> {
        let seq: Vec<String> = secs.iter().map(|[c,h,s]| format!("{},{},{}",c,h,s)).collect();
        self.bin2bin(&["get","-t","sec","-f",&seq.join(",,")])
    }
    fn read_block(&mut self,block: usize) -> Result<Vec<u8>,DYNERR> {
        self.bin2bin(&["get","-t","block","-f",&block.to_string()])
    }
    fn read_track_nibbles(&mut self,cyl: usize,head: usize) -> Result<Vec<u8>,DYNERR> {
        self.bin2bin(&["get","-t","track","-f",&format!("{},{}",cyl,head)])
    }
    fn read_geometry(&mut self) -> Result<String,DYNERR> {
        self.bin2txt(&["geometry"])
    }
    fn read_stat(&mut self) -> Result<String,DYNERR> {
        self.bin2txt(&["stat"])
    }
}
