//! Response decoding and provider error mapping.

use crate::Result;
use dimensiondata_core::xml::{XmlDocument, SERVER_NS, TYPES_URN};
use dimensiondata_core::{Error, ErrorCode};
use reqwest::StatusCode;

/// Lookup order for the error code of a `400` body: API 1 server schema, then API 2 types.
const RESPONSE_CODE_FIELDS: [(&str, &str); 2] =
    [("responseCode", SERVER_NS), ("responseCode", TYPES_URN)];

/// Lookup order for the error message of a `400` body.
const MESSAGE_FIELDS: [(&str, &str); 2] = [("message", SERVER_NS), ("message", TYPES_URN)];

/// Classifies a completed response.
///
/// `200 OK` returns the body untouched. `401`/`403` become
/// [`Error::InvalidCredentials`]; a `400` is decoded into an [`Error::Api`] using
/// the provider's `responseCode` and `message`; anything else becomes an
/// [`Error::Api`] carrying the HTTP status and raw body.
///
/// # Errors
///
/// Returns the classified error for every status other than `200`, or
/// [`Error::MalformedResponse`] when a `400` body is not XML.
pub fn parse_response(status: StatusCode, body: String, driver: &str) -> Result<String> {
    match status {
        StatusCode::OK => Ok(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::InvalidCredentials(body)),
        StatusCode::BAD_REQUEST => Err(parse_bad_request(&body, driver)?),
        other => Err(Error::api(other.as_u16(), body, driver)),
    }
}

fn parse_bad_request(body: &str, driver: &str) -> Result<Error> {
    let document = XmlDocument::parse(body)?;

    let code = document
        .findtext_any(&RESPONSE_CODE_FIELDS)
        .map_or(ErrorCode::Http(StatusCode::BAD_REQUEST.as_u16()), ErrorCode::from);
    let message = document.findtext_any(&MESSAGE_FIELDS).unwrap_or_default();

    Ok(Error::api(code, message, driver))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVER: &str = "DimensionData";

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn ok_returns_body_unchanged() {
        let body = "<Account xmlns=\"x\"><a>1</a></Account>".to_string();
        assert_eq!(parse_response(StatusCode::OK, body.clone(), DRIVER).unwrap(), body);
        // Not parsed, so non-XML success bodies pass through too.
        assert_eq!(
            parse_response(StatusCode::OK, "not xml".into(), DRIVER).unwrap(),
            "not xml"
        );
    }

    #[test]
    fn unauthorized_and_forbidden_are_credential_errors() {
        for code in [401, 403] {
            for body in ["", "denied", "<xml/>", "<<<"] {
                let err = parse_response(status(code), body.to_string(), DRIVER).unwrap_err();
                assert_eq!(err, Error::InvalidCredentials(body.to_string()));
            }
        }
    }

    #[test]
    fn bad_request_reads_server_namespace() {
        let body = format!(
            r#"<ns4:Status xmlns:ns4="{SERVER_NS}">
                <ns4:operation>Add Server</ns4:operation>
                <ns4:responseCode>REASON_392</ns4:responseCode>
                <ns4:message>Server name already in use</ns4:message>
            </ns4:Status>"#
        );
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(
            err,
            Error::api("REASON_392", "Server name already in use", DRIVER)
        );
    }

    #[test]
    fn bad_request_falls_back_to_types_namespace() {
        let body = format!(
            r#"<response xmlns="{TYPES_URN}" requestId="na9_20160321T074626030-0400_7e9fffe7">
                <operation>CREATE_VLAN</operation>
                <responseCode>RESOURCE_NOT_FOUND</responseCode>
                <message>Network Domain 'abc' not found.</message>
            </response>"#
        );
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(
            err.api_code(),
            Some(&ErrorCode::Provider("RESOURCE_NOT_FOUND".into()))
        );
        assert_eq!(err.to_string(), "RESOURCE_NOT_FOUND: Network Domain 'abc' not found.");
    }

    #[test]
    fn bad_request_mixes_namespaces_per_field() {
        let body = format!(
            r#"<r xmlns:s="{SERVER_NS}" xmlns:t="{TYPES_URN}"><t:responseCode>T_CODE</t:responseCode><s:message>server message</s:message><t:message>types message</t:message></r>"#
        );
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(err, Error::api("T_CODE", "server message", DRIVER));
    }

    #[test]
    fn bad_request_message_is_exact_text() {
        let body = format!(
            r#"<response xmlns="{TYPES_URN}"><responseCode>X</responseCode><message>  padded message  </message></response>"#
        );
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(err, Error::api("X", "  padded message  ", DRIVER));

        let body = format!(
            r#"<response xmlns="{TYPES_URN}"><responseCode>X</responseCode><message>a <![CDATA[b]]> c</message></response>"#
        );
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(err, Error::api("X", "a b c", DRIVER));
    }

    #[test]
    fn bad_request_without_fields_uses_status() {
        let body = "<response xmlns=\"urn:other\"><detail>x</detail></response>".to_string();
        let err = parse_response(StatusCode::BAD_REQUEST, body, DRIVER).unwrap_err();
        assert_eq!(err, Error::api(400u16, "", DRIVER));
    }

    #[test]
    fn bad_request_with_non_xml_body_is_malformed() {
        let err = parse_response(StatusCode::BAD_REQUEST, "Bad Request".into(), DRIVER)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn other_statuses_carry_status_and_raw_body() {
        for code in [201, 204, 302, 404, 409, 500, 502, 503] {
            let body = format!("<html>status {code}</html>");
            let err = parse_response(status(code), body.clone(), DRIVER).unwrap_err();
            match err {
                Error::Api {
                    code: ErrorCode::Http(got),
                    message,
                    driver,
                } => {
                    assert_eq!(got, code);
                    assert_eq!(message, body);
                    assert_eq!(driver, DRIVER);
                }
                other => panic!("unexpected error for {code}: {other:?}"),
            }
        }
    }
}
