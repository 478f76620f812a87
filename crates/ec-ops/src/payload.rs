//! Request payloads and endpoint names for each upstream lookup.
//!
//! Builders are pure: they take the caller's values plus the `uid`/`time` fields and
//! return the JSON object that gets encrypted into the `params` query parameter.
//! District court deployments additionally expect the language flags.

use crate::request::{CaseNumberQuery, CauseListQuery};
use chrono::NaiveDate;
use ec_core::CourtType;
use serde_json::{json, Map, Value};

/// State list.
pub const STATES_ENDPOINT: &str = "stateWebService.php";
/// District list for a state.
pub const DISTRICTS_ENDPOINT: &str = "districtWebService.php";
/// Court complexes for a district.
pub const COURTS_ENDPOINT: &str = "courtEstWebService.php";
/// Case types of an establishment.
pub const CASE_TYPES_ENDPOINT: &str = "caseNumberWebService.php";
/// Search by case type, number and year.
pub const CASE_NUMBER_SEARCH_ENDPOINT: &str = "caseNumberSearch.php";
/// District court CNR lookup.
pub const CNR_SEARCH_ENDPOINT: &str = "listOfCasesWebService.php";
/// Case history (also the high court CNR lookup).
pub const CASE_HISTORY_ENDPOINT: &str = "caseHistoryWebService.php";
/// Daily cause list.
pub const CAUSE_LIST_ENDPOINT: &str = "cases_new.php";

/// API version reported on district court CNR searches.
const CNR_VERSION_NUMBER: &str = "3.0";

/// State list lookup.
pub fn states(uid: &str, time: &str) -> Value {
    json!({ "action_code": "fillState", "time": time, "uid": uid })
}

/// District list lookup.
pub fn districts(state_code: &str, uid: &str, time: &str) -> Value {
    json!({
        "action_code": "fillDistrict",
        "state_code": state_code,
        "time": time,
        "uid": uid,
    })
}

/// Court complexes. The upstream takes no `uid` on this call.
pub fn courts(state_code: &str, district_code: &str) -> Value {
    json!({
        "action_code": "fillCourtComplex",
        "state_code": state_code,
        "dist_code": district_code,
    })
}

/// Case types. `court_code` may be a `"<complex>-<establishment>"` pair; only the
/// establishment half is sent.
pub fn case_types(
    court: CourtType,
    state_code: &str,
    district_code: &str,
    court_code: &str,
    uid: &str,
) -> Value {
    let mut payload = object([
        ("state_code", state_code.into()),
        ("dist_code", district_code.into()),
        ("court_code", establishment_code(court_code).into()),
        ("uid", uid.into()),
    ]);
    add_language_flags(court, &mut payload);
    Value::Object(payload)
}

/// Case number search; court codes are comma-joined.
pub fn case_number_search(query: &CaseNumberQuery, uid: &str) -> Value {
    let mut payload = object([
        ("case_number", query.case_number.as_str().into()),
        ("case_type", query.case_type.as_str().into()),
        ("year", query.year.as_str().into()),
        ("state_code", query.state_code.as_str().into()),
        ("dist_code", query.district_code.as_str().into()),
        ("court_code_arr", query.court_codes.join(",").into()),
        ("uid", uid.into()),
    ]);
    add_language_flags(query.court_type, &mut payload);
    Value::Object(payload)
}

/// CNR search: the district court list endpoint or the high court history endpoint.
pub fn cnr_search(court: CourtType, cnr: &str, uid: &str) -> (&'static str, Value) {
    let mut payload = object([("cino", cnr.into()), ("uid", uid.into())]);
    let endpoint = match court {
        CourtType::DistrictCourt => {
            add_language_flags(court, &mut payload);
            payload.insert("version_number".into(), CNR_VERSION_NUMBER.into());
            CNR_SEARCH_ENDPOINT
        }
        CourtType::HighCourt => CASE_HISTORY_ENDPOINT,
    };
    (endpoint, Value::Object(payload))
}

/// Case history. District courts key the CNR as `cinum`, high courts as `cino`.
pub fn case_history(court: CourtType, cnr: &str, uid: &str) -> Value {
    let mut payload = object([("uid", uid.into())]);
    match court {
        CourtType::DistrictCourt => {
            payload.insert("cinum".into(), cnr.into());
            add_language_flags(court, &mut payload);
        }
        CourtType::HighCourt => {
            payload.insert("cino".into(), cnr.into());
        }
    }
    Value::Object(payload)
}

/// Cause list for one court room and date.
pub fn cause_list(query: &CauseListQuery, today: NaiveDate, uid: &str) -> Value {
    let mut payload = object([
        ("state_code", query.state_code.as_str().into()),
        ("dist_code", query.district_code.as_str().into()),
        ("selprevdays", look_back_flag(&query.causelist_date, today).into()),
        ("court_no", query.court_no.as_str().into()),
        ("court_code", query.court_code.as_str().into()),
        ("causelist_date", query.causelist_date.as_str().into()),
        ("uid", uid.into()),
    ]);
    if let Some(flag) = &query.case_type {
        payload.insert("flag".into(), flag.as_str().into());
    }
    add_language_flags(query.court_type, &mut payload);
    Value::Object(payload)
}

/// `selprevdays`: `"1"` for a date after `today`, `"0"` for today, past or unparseable dates.
pub fn look_back_flag(date: &str, today: NaiveDate) -> &'static str {
    match parse_date(date) {
        Some(date) if date > today => "1",
        _ => "0",
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%d-%m-%Y"))
        .ok()
}

fn establishment_code(court_code: &str) -> &str {
    court_code
        .split('-')
        .nth(1)
        .filter(|establishment| !establishment.is_empty())
        .unwrap_or(court_code)
}

fn add_language_flags(court: CourtType, payload: &mut Map<String, Value>) {
    if court == CourtType::DistrictCourt {
        payload.insert("language_flag".into(), "english".into());
        payload.insert("bilingual_flag".into(), "0".into());
    }
}

fn object<const N: usize>(fields: [(&str, Value); N]) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}
