use std::time::Instant;
use tracing::{debug, error, info};

/// BoundaryLogger - 외부 시스템(MEXC) 경계에서 로깅을 담당
///
/// 로깅 포맷: [trace_id] [호출자→피호출자] [작업] [상태] [duration]
/// 서명, 시크릿은 절대 기록하지 않습니다.
#[derive(Debug, Clone)]
pub struct BoundaryLogger {
    from: &'static str,
    system: &'static str,
}

impl BoundaryLogger {
    pub fn new(from: &'static str, system: &'static str) -> Self {
        Self { from, system }
    }

    /// 외부 호출 시작
    /// 예: [Client→MEXC] GET /api/v3/depth [EXT→]
    pub fn external_call(&self, trace_id: &str, method: &str, path: &str) {
        debug!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            flow = format!("{}→{}", self.from, self.system),
            stage = "EXT→",
            "[{}] [{}→{}] {} {} [EXT→]",
            trace_id, self.from, self.system, method, path
        );
    }

    /// 외부 호출 완료
    /// 예: [Client→MEXC] GET /api/v3/depth [←DONE] 85.12ms status=200
    pub fn external_done(&self, trace_id: &str, method: &str, path: &str, duration_ms: f64, status: u16) {
        info!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            flow = format!("{}→{}", self.from, self.system),
            stage = "←DONE",
            duration_ms = %duration_ms,
            status = %status,
            "[{}] [{}→{}] {} {} [←DONE] {:.2}ms status={}",
            trace_id, self.from, self.system, method, path, duration_ms, status
        );
    }

    /// 외부 호출 에러
    pub fn external_error<E: std::fmt::Display>(
        &self,
        trace_id: &str,
        method: &str,
        path: &str,
        duration_ms: f64,
        error: &E,
    ) {
        error!(
            trace_id = %trace_id,
            method = %method,
            path = %path,
            flow = format!("{}→{}", self.from, self.system),
            stage = "←FAIL",
            duration_ms = %duration_ms,
            error = %error,
            "[{}] [{}→{}] {} {} [←FAIL] {:.2}ms error={}",
            trace_id, self.from, self.system, method, path, duration_ms, error
        );
    }
}

impl Default for BoundaryLogger {
    fn default() -> Self {
        Self::new("Client", "MEXC")
    }
}

/// 성능 측정용 타이머
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// 타이머 시작
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// 경과 시간 (밀리초)
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}
