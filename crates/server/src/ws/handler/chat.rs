use crate::ws::events::ClientEvent;

use super::UserSession;

pub async fn handle_client_event(session: &UserSession, event: ClientEvent) {
    let result = match event {
        ClientEvent::JoinRoom { room } => session.switch_room(&room).await,
        ClientEvent::SendMessage { content } => session.send(&content).await,
        ClientEvent::BeginEdit { message_id } => session.begin_edit(&message_id).await.map(|_| ()),
        ClientEvent::CancelEdit => {
            session.cancel_edit().await;
            Ok(())
        }
        ClientEvent::DeleteMessage { message_id } => session.delete(&message_id).await,
        ClientEvent::AddReaction { message_id, emoji } => {
            session.react(&message_id, &emoji).await.map(|_| ())
        }
        ClientEvent::ClearRoom => session.clear().await,
        ClientEvent::Ping => Ok(()),
    };

    if let Err(e) = result {
        session.report_error(&e).await;
    }
}
