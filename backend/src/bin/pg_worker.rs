//! Privilege-dropping PostgreSQL helper for the repository integration tests.
//!
//! When the test process runs as root, `pg_embedded_setup_unpriv` cannot run
//! `initdb` or the postmaster itself. It re-executes this binary as an
//! unprivileged user with a lifecycle step and the path of a JSON
//! [`WorkerPayload`].
//!
//! Usage: `pg_worker <setup|start|stop> <payload.json>`

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Report, Result, eyre};
use pg_embedded_setup_unpriv::worker::WorkerPayload;
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    let invocation = Invocation::from_args(env::args_os())?;
    let payload = read_payload(&invocation.payload_path)?;
    run_step(invocation.step, payload)
}

/// Lifecycle step requested by the cluster bootstrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Setup,
    Start,
    Stop,
}

impl Step {
    fn parse(raw: &OsStr) -> Result<Self> {
        match raw.to_string_lossy().as_ref() {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!(
                "unknown pg_worker step '{other}'; expected setup, start, or stop"
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}

#[derive(Debug)]
struct Invocation {
    step: Step,
    payload_path: OsString,
}

impl Invocation {
    fn from_args(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let _program = args.next();
        let step = args.next().ok_or_else(|| eyre!("missing step argument"))?;
        let payload_path = args
            .next()
            .ok_or_else(|| eyre!("missing payload path argument"))?;
        if let Some(extra) = args.next() {
            return Err(eyre!(
                "unexpected argument {}; usage: pg_worker <step> <payload.json>",
                extra.to_string_lossy()
            ));
        }
        Ok(Self {
            step: Step::parse(&step)?,
            payload_path,
        })
    }
}

fn read_payload(path: impl AsRef<Path>) -> Result<WorkerPayload> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read worker payload {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("decode worker payload {}", path.display()))
}

fn run_step(step: Step, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("rebuild postgres settings"))?;

    for (key, value) in payload.environment {
        // SAFETY: the worker is single-threaded until the runtime below is built.
        match value.map(|secret| secret.expose().to_owned()) {
            Some(value) => unsafe { env::set_var(&key, value) },
            None => unsafe { env::remove_var(&key) },
        }
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build pg_worker runtime")?;

    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match step {
                Step::Setup => postgres.setup().await,
                Step::Start => postgres.start().await,
                Step::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgres {step} failed"))
}
