//! Wire protocol for the realtime channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Event names are fixed by the backend contract; the serde kebab-case
//! rename produces them directly from the variant names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{BloodType, DonationStatus, Notification, RequestStatus};

/// Events the client emits into the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinUserRoom { user_id: Uuid },
    JoinRequestRoom { request_id: Uuid },
    LeaveRequestRoom { request_id: Uuid },
    MarkNotificationRead { notification_id: Uuid },
    MarkAllNotificationsRead,
    SubscribeBloodRequest { request_id: Uuid },
    Typing { room: String },
}

/// Events the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    NewNotification(Notification),
    BloodRequestUpdate {
        request_id: Uuid,
        status: RequestStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    DonationUpdate {
        donation_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<Uuid>,
        status: DonationStatus,
    },
    EmergencyAlert {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        blood_type: Option<BloodType>,
        message: String,
    },
    SystemAnnouncement {
        title: String,
        message: String,
    },
    UserStatusUpdate {
        user_id: Uuid,
        online: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationPriority;
    use chrono::Utc;

    #[test]
    fn client_event_names_match_contract() {
        let cases = vec![
            (
                ClientEvent::JoinUserRoom {
                    user_id: Uuid::new_v4(),
                },
                "join-user-room",
            ),
            (
                ClientEvent::JoinRequestRoom {
                    request_id: Uuid::new_v4(),
                },
                "join-request-room",
            ),
            (
                ClientEvent::LeaveRequestRoom {
                    request_id: Uuid::new_v4(),
                },
                "leave-request-room",
            ),
            (
                ClientEvent::MarkNotificationRead {
                    notification_id: Uuid::new_v4(),
                },
                "mark-notification-read",
            ),
            (ClientEvent::MarkAllNotificationsRead, "mark-all-notifications-read"),
            (
                ClientEvent::SubscribeBloodRequest {
                    request_id: Uuid::new_v4(),
                },
                "subscribe-blood-request",
            ),
            (
                ClientEvent::Typing {
                    room: "request:1".to_string(),
                },
                "typing",
            ),
        ];

        for (event, name) in cases {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], name);
        }
    }

    #[test]
    fn server_event_parses_new_notification() {
        let raw = serde_json::json!({
            "event": "new-notification",
            "data": {
                "id": Uuid::new_v4(),
                "title": "Critical request nearby",
                "message": "O- needed at General Hospital",
                "kind": "request_match",
                "priority": "critical",
                "read": false,
                "createdAt": Utc::now(),
            }
        });

        let event: ServerEvent = serde_json::from_value(raw).unwrap();
        match event {
            ServerEvent::NewNotification(n) => {
                assert_eq!(n.priority, NotificationPriority::Critical);
                assert!(!n.read);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn server_event_field_names_are_camel_case() {
        let event = ServerEvent::BloodRequestUpdate {
            request_id: Uuid::new_v4(),
            status: RequestStatus::Matched,
            message: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "blood-request-update");
        assert!(json["data"].get("requestId").is_some());
    }
}
