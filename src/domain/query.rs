// Ad-hoc chart-data query descriptors, sent verbatim to the dashboard server
use serde::Serialize;
use serde_json::{Map, Value};

const NO_TIME_FILTER: &str = "No filter";
const EVENT_TIME_COLUMN: &str = "emission_time";
const DAILY_GRAIN: &str = "P1D";
pub const RAW_EVENT_ROW_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryExtras {
    pub time_grain_sqla: String,
    pub having: String,
    pub having_druid: Vec<Value>,
    #[serde(rename = "where")]
    pub where_clause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub time_range: String,
    pub granularity: String,
    pub filters: Vec<Value>,
    pub extras: QueryExtras,
    pub applied_time_extras: Map<String, Value>,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<Value>>,
    pub annotation_layers: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<u32>,
    pub timeseries_limit: u32,
    pub order_desc: bool,
    pub url_params: Map<String, Value>,
    pub custom_params: Map<String, Value>,
    pub custom_form_data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<Vec<Value>>,
}

impl QueryDescriptor {
    fn unfiltered(where_clause: &str) -> Self {
        Self {
            time_range: NO_TIME_FILTER.to_string(),
            granularity: EVENT_TIME_COLUMN.to_string(),
            filters: Vec::new(),
            extras: QueryExtras {
                time_grain_sqla: DAILY_GRAIN.to_string(),
                having: String::new(),
                having_druid: Vec::new(),
                where_clause: where_clause.to_string(),
            },
            applied_time_extras: Map::new(),
            columns: Vec::new(),
            metrics: None,
            orderby: None,
            annotation_layers: Vec::new(),
            row_limit: None,
            timeseries_limit: 0,
            order_desc: true,
            url_params: Map::new(),
            custom_params: Map::new(),
            custom_form_data: Map::new(),
            post_processing: None,
        }
    }

    /// Row listing of events whose object id mentions a video
    pub fn video_events() -> Self {
        let mut query = Self::unfiltered("(object_id like '%video%')");
        query.columns = ["verb_id", "course_id", "object_id", "actor_id", "event_id"]
            .into_iter()
            .map(String::from)
            .collect();
        query.orderby = Some(Vec::new());
        query.row_limit = Some(RAW_EVENT_ROW_LIMIT);
        query.post_processing = Some(Vec::new());
        query
    }

    /// Single `count` aggregate over every event
    pub fn event_count() -> Self {
        let mut query = Self::unfiltered("");
        query.metrics = Some(vec!["count".to_string()]);
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datasource {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    #[default]
    Json,
}

/// Body of `POST /api/v1/chart/data`
#[derive(Debug, Clone, Serialize)]
pub struct ChartDataRequest<'a> {
    pub datasource: &'a Datasource,
    pub force: bool,
    pub queries: &'a [QueryDescriptor],
    pub result_format: ResultFormat,
    pub result_type: &'static str,
}

impl<'a> ChartDataRequest<'a> {
    pub fn new(
        datasource: &'a Datasource,
        queries: &'a [QueryDescriptor],
        force: bool,
        result_format: ResultFormat,
    ) -> Self {
        Self {
            datasource,
            force,
            queries,
            result_format,
            result_type: "full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_events_descriptor() {
        let value = serde_json::to_value(QueryDescriptor::video_events()).unwrap();

        assert_eq!(
            value["columns"],
            json!(["verb_id", "course_id", "object_id", "actor_id", "event_id"])
        );
        assert_eq!(value["extras"]["where"], "(object_id like '%video%')");
        assert_eq!(value["row_limit"], 10000);
        assert_eq!(value["orderby"], json!([]));
        assert_eq!(value["order_desc"], true);
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn test_event_count_descriptor() {
        let value = serde_json::to_value(QueryDescriptor::event_count()).unwrap();

        assert_eq!(value["metrics"], json!(["count"]));
        assert_eq!(value["extras"]["where"], "");
        assert_eq!(value["columns"], json!([]));
        assert!(value.get("row_limit").is_none());
        assert!(value.get("post_processing").is_none());
    }

    #[test]
    fn test_chart_data_request_body() {
        let datasource = Datasource {
            id: 2,
            kind: "table".to_string(),
        };
        let queries = [QueryDescriptor::event_count()];
        let body = serde_json::to_value(ChartDataRequest::new(
            &datasource,
            &queries,
            false,
            ResultFormat::default(),
        ))
        .unwrap();

        assert_eq!(body["datasource"], json!({"id": 2, "type": "table"}));
        assert_eq!(body["force"], false);
        assert_eq!(body["result_format"], "json");
        assert_eq!(body["result_type"], "full");
        assert_eq!(body["queries"].as_array().unwrap().len(), 1);
    }
}
