use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use junktion::demo::{generate_demo_requests, DemoOptions};
use junktion::drive::drive;
use junktion::event::{create_request_queue, PathRequest, PlanOutput, RequestReceiver, RequestWatcher};
use junktion::{Path, Planner, PlannerConfig, Pose, Result};

/// How a one-shot plan is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

/// What the application does once started
#[derive(Debug, Clone)]
pub enum Mode {
    /// Plan one path and print it
    Plan {
        start: Pose,
        end: Pose,
        speed: Option<f64>,
        exit_only: bool,
        format: OutputFormat,
    },
    /// Plan one path and emit its poses at a fixed cadence
    Drive {
        start: Pose,
        end: Pose,
        speed: Option<f64>,
        tick: Duration,
    },
    /// Answer requests appended to a JSON-lines file
    Watch { file: PathBuf },
    /// Answer randomly generated junction crossings
    Demo(DemoOptions),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub planner: PlannerConfig,
    pub mode: Mode,
}

/// Main application state
pub struct App {
    config: AppConfig,
    planner: Planner,
    planned: usize,
    rejected: usize,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let planner = Planner::new(config.planner.clone());
        Self {
            config,
            planner,
            planned: 0,
            rejected: 0,
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        match self.config.mode.clone() {
            Mode::Plan {
                start,
                end,
                speed,
                exit_only,
                format,
            } => self.run_plan(start, end, speed, exit_only, format),
            Mode::Drive {
                start,
                end,
                speed,
                tick,
            } => self.run_drive(start, end, speed, tick).await,
            Mode::Watch { file } => self.run_watch(file).await,
            Mode::Demo(options) => self.run_demo(options).await,
        }
    }

    fn speed_or_default(&self, speed: Option<f64>) -> f64 {
        speed.unwrap_or(self.config.planner.default_speed)
    }

    fn run_plan(
        &mut self,
        start: Pose,
        end: Pose,
        speed: Option<f64>,
        exit_only: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let speed = self.speed_or_default(speed);
        let path = if exit_only {
            self.planner.build_path(start, end, speed)?
        } else {
            self.planner.route(start, end, speed)?
        };

        match format {
            OutputFormat::Json => emit(&PlanOutput::Path {
                id: "plan".to_string(),
                speed,
                poses: path,
            }),
            OutputFormat::Table => print_table(&path),
        }
    }

    async fn run_drive(&mut self, start: Pose, end: Pose, speed: Option<f64>, tick: Duration) -> Result<()> {
        let speed = self.speed_or_default(speed);
        let path = self.planner.route(start, end, speed)?;

        let (tx, mut rx) = mpsc::channel(64);
        let driver = tokio::spawn(drive("drive".to_string(), path, tick, tx));

        loop {
            tokio::select! {
                output = rx.recv() => match output {
                    Some(output) => emit(&output)?,
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Interrupted, stopping drive");
                    driver.abort();
                    break;
                }
            }
        }

        Ok(())
    }

    async fn run_watch(&mut self, file: PathBuf) -> Result<()> {
        let (request_tx, mut request_rx) = create_request_queue();
        let watcher = RequestWatcher::new(&file, request_tx.inner())?;
        drop(request_tx);

        for request in watcher.read_existing() {
            self.answer(&request)?;
        }

        self.serve(&mut request_rx).await?;
        drop(watcher);
        Ok(())
    }

    async fn run_demo(&mut self, options: DemoOptions) -> Result<()> {
        let (request_tx, mut request_rx) = create_request_queue();
        tokio::spawn(generate_demo_requests(request_tx.inner(), options));
        drop(request_tx);

        self.serve(&mut request_rx).await
    }

    /// Answer queued requests until the queue closes or the user interrupts
    async fn serve(&mut self, rx: &mut RequestReceiver) -> Result<()> {
        loop {
            tokio::select! {
                request = rx.recv() => match request {
                    Some(request) => self.answer(&request)?,
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Interrupted");
                    break;
                }
            }
        }

        log::info!("Planned {} paths, rejected {}", self.planned, self.rejected);
        Ok(())
    }

    /// Plan a single request and write the outcome
    fn answer(&mut self, request: &PathRequest) -> Result<()> {
        let output = self.plan_request(request);
        log::trace!("Answering {}", output.id());
        emit(&output)
    }

    fn plan_request(&mut self, request: &PathRequest) -> PlanOutput {
        let speed = self.speed_or_default(request.speed);

        match self.planner.route(request.start, request.end, speed) {
            Ok(poses) => {
                self.planned += 1;
                PlanOutput::Path {
                    id: request.id.clone(),
                    speed,
                    poses,
                }
            }
            Err(e) => {
                self.rejected += 1;
                log::warn!("Rejected request {}: {}", request.id, e);
                PlanOutput::Rejected {
                    id: request.id.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Write one output line to stdout
fn emit(output: &PlanOutput) -> Result<()> {
    let line = output.to_json_line()?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

fn print_table(path: &Path) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{:>5}  {:>12}  {:>12}  {:>10}", "#", "x", "y", "theta")?;
    for (i, pose) in path.iter().enumerate() {
        writeln!(
            stdout,
            "{:>5}  {:>12.4}  {:>12.4}  {:>10.4}",
            i, pose.x, pose.y, pose.theta
        )?;
    }
    writeln!(stdout, "{} poses, length {:.3}", path.len(), path.total_length())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn app() -> App {
        App::new(AppConfig {
            planner: PlannerConfig::default(),
            mode: Mode::Demo(DemoOptions::default()),
        })
    }

    #[test]
    fn test_plan_request_uses_default_speed() {
        let mut app = app();
        let request = PathRequest::new("car-1", Pose::new(0.0, 0.0, 0.0), Pose::new(10.0, 0.0, 0.0));

        match app.plan_request(&request) {
            PlanOutput::Path { speed, poses, .. } => {
                assert_eq!(speed, 1.0);
                assert_eq!(poses.len(), 11);
            }
            other => panic!("expected a path, got {:?}", other),
        }
        assert_eq!(app.planned, 1);
    }

    #[test]
    fn test_plan_request_rejects_bad_speed() {
        let mut app = app();
        let request = PathRequest::new("car-2", Pose::new(2.0, 0.0, 0.0), Pose::new(8.0, 8.0, 0.5 * PI))
            .with_speed(-1.0);

        assert!(matches!(app.plan_request(&request), PlanOutput::Rejected { .. }));
        assert_eq!(app.rejected, 1);
    }
}
