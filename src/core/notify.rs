#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Fire-and-forget user notifications.
pub trait NotificationSink {
    fn notify(&mut self, severity: Severity, message: &str);
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub messages: Vec<(Severity, String)>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|(s, _)| *s == severity).count()
    }

    pub fn last(&self) -> Option<&(Severity, String)> {
        self.messages.last()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingSink {
    fn notify(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_string()));
    }
}
