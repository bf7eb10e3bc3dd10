//! Reporting events: one batch of data points from a single task

use std::fmt;

use serde::Deserialize;

use super::value::RawValue;

/// Identity of the task that produced a reporting event
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskInfo {
    pub worker_host: String,
    pub worker_port: u16,
    /// Component the task belongs to; becomes the source identity of every metric
    pub component_id: String,
    pub task_id: i32,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub update_interval_secs: u32,
}

impl fmt::Display for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TaskInfo{{srcWorkerHost='{}', srcWorkerPort={}, srcComponentId='{}', srcTaskId={}, timestamp={}, updateIntervalSecs={}}}",
            self.worker_host,
            self.worker_port,
            self.component_id,
            self.task_id,
            self.timestamp,
            self.update_interval_secs
        )
    }
}

/// A single raw observation: framework-supplied name plus a possibly nested value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataPoint {
    pub name: String,
    #[serde(default)]
    pub value: RawValue,
}

impl DataPoint {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One delivery of data points for a single task at a point in time
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportingEvent {
    #[serde(default)]
    pub task: TaskInfo,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_info_display() {
        let task = TaskInfo {
            worker_host: "node-1".to_string(),
            worker_port: 6700,
            component_id: "spout".to_string(),
            task_id: 7,
            timestamp: 1_700_000_000,
            update_interval_secs: 60,
        };
        assert_eq!(
            task.to_string(),
            "TaskInfo{srcWorkerHost='node-1', srcWorkerPort=6700, srcComponentId='spout', srcTaskId=7, timestamp=1700000000, updateIntervalSecs=60}"
        );
    }

    #[test]
    fn test_event_parse_full() {
        let json = r#"{
            "task": {"worker_host": "h", "worker_port": 6701, "component_id": "bolt", "task_id": 2, "timestamp": 10, "update_interval_secs": 30},
            "data_points": [
                {"name": "__ack-count", "value": {"default": 4}},
                {"name": "latency", "value": 1.5}
            ]
        }"#;
        let event: ReportingEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.task.component_id, "bolt");
        assert_eq!(event.task.worker_port, 6701);
        assert_eq!(event.data_points.len(), 2);
        assert_eq!(event.data_points[1], DataPoint::new("latency", 1.5));
        assert_eq!(
            event.data_points[0].value,
            RawValue::mapping([("default", 4.0)])
        );
    }

    #[test]
    fn test_event_parse_partial() {
        let event: ReportingEvent =
            serde_json::from_str(r#"{"task": {"component_id": "c"}}"#).unwrap();
        assert_eq!(event.task.component_id, "c");
        assert_eq!(event.task.task_id, 0);
        assert!(event.data_points.is_empty());
    }

    #[test]
    fn test_data_point_missing_value_is_null() {
        let point: DataPoint = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(point.value, RawValue::Null);
    }
}
