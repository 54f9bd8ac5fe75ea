//! 实时驱动
//!
//! 把真实流逝的时间喂给 Runtime 的虚拟时钟，并在下一个截止时间前休眠。
//! 使用 `tokio::time`，测试中可以暂停时间逐步推进。

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use super::{App, Flow};

/// 真实时钟
#[derive(Debug)]
pub struct RealClock {
    last: Instant,
}

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RealClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// 把上次同步以来的真实时间推进到虚拟时钟
    pub fn sync<W: Write>(&mut self, app: &mut App<W>) {
        let now = Instant::now();
        app.advance(now - self.last);
        self.last = now;
    }

    /// 下一次唤醒对应的真实时刻
    pub fn wake_at<W: Write>(&self, app: &App<W>) -> Option<Instant> {
        app.next_wake()
            .map(|wake| self.last + wake.saturating_sub(app.now()))
    }

    /// 实时等待一段时间，期间照常触发定时器
    pub async fn wait<W: Write>(&mut self, app: &mut App<W>, duration: Duration) {
        let end = Instant::now() + duration;
        loop {
            let until = self.wake_at(app).map_or(end, |wake| wake.min(end));
            sleep_until(until).await;
            self.sync(app);
            if Instant::now() >= end {
                break;
            }
        }
    }

    /// 实时运行到没有待处理的定时器和视频
    pub async fn run_until_idle<W: Write>(&mut self, app: &mut App<W>) {
        while let Some(wake) = self.wake_at(app) {
            sleep_until(wake).await;
            self.sync(app);
        }
    }
}

/// 驱动循环：读取指令行，同时在截止时间唤醒
///
/// 输入结束后把剩余流程走完；读到 `quit` 时立即返回。
pub async fn drive<R, W>(app: &mut App<W>, reader: R, fast_forward: bool) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut clock = RealClock::new();
    if fast_forward {
        app.fast_forward();
    }

    loop {
        let wake = clock.wake_at(app);
        tokio::select! {
            line = lines.next_line() => {
                if !fast_forward {
                    clock.sync(app);
                }
                let Some(line) = line? else {
                    debug!("输入结束");
                    break;
                };
                match app.handle_line(&line) {
                    Flow::Continue => {}
                    Flow::Wait(duration) if fast_forward => app.advance(duration),
                    Flow::Wait(duration) => clock.wait(app, duration).await,
                    Flow::Quit => return Ok(()),
                }
                if fast_forward {
                    app.fast_forward();
                }
            }
            _ = sleep_until(wake.unwrap_or_else(Instant::now)), if wake.is_some() && !fast_forward => {
                clock.sync(app);
            }
        }
    }

    if fast_forward {
        app.fast_forward();
    } else {
        clock.run_until_idle(app).await;
    }
    Ok(())
}
