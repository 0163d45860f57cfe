#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifecycle {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ServiceLifecycle {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for ServiceLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(label)
    }
}

pub fn can_transition(from: ServiceLifecycle, to: ServiceLifecycle) -> bool {
    matches!(
        (from, to),
        (ServiceLifecycle::Stopped, ServiceLifecycle::Starting)
            | (ServiceLifecycle::Starting, ServiceLifecycle::Running)
            | (ServiceLifecycle::Starting, ServiceLifecycle::Stopped)
            | (ServiceLifecycle::Running, ServiceLifecycle::Stopping)
            | (ServiceLifecycle::Stopping, ServiceLifecycle::Stopped)
    ) || from == to
}
