//! Drives `HudRuntime` over an in-memory duplex pipe, playing the host.

use hud_core::config::Config;
use hud_ui::features::inventory::InventoryIntent;
use hud_ui::{HudRuntime, UserIntent};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

async fn next_message<R>(lines: &mut Lines<R>) -> Value
where
    R: AsyncBufRead + Unpin,
{
    let line = lines
        .next_line()
        .await
        .expect("read from hud")
        .expect("hud closed early");
    serde_json::from_str(&line).expect("hud wrote valid json")
}

async fn send(writer: &mut (impl AsyncWrite + Unpin), message: Value) {
    let mut line = message.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await.unwrap();
}

#[tokio::test]
async fn test_inventory_session_over_stdio() {
    let (hud_in, mut host_out) = tokio::io::duplex(8 * 1024);
    let (host_in, hud_out) = tokio::io::duplex(8 * 1024);

    let mut runtime = HudRuntime::new(Config::default());
    let handle = runtime.handle();
    let mut lifecycle = runtime.subscribe_lifecycle();

    let host = async move {
        let mut lines = BufReader::new(host_in).lines();

        send(
            &mut host_out,
            json!({
                "type": "event",
                "action": "openInventory",
                "data": {"inventory": {
                    "main": [{"slot": 0, "name": "water", "amount": 5, "weight": 0.5}],
                    "maxWeight": 50
                }}
            }),
        )
        .await;

        let focus = next_message(&mut lines).await;
        assert_eq!(focus["action"], "setNuiFocus");
        assert_eq!(focus["payload"], json!({"hasFocus": true, "hasCursor": true}));
        assert!(focus.get("id").is_none());

        handle.intent(UserIntent::Inventory(InventoryIntent::BeginRelocation {
            slot: 0,
        }));
        handle.intent(UserIntent::Inventory(
            InventoryIntent::CompleteRelocation { target_slot: 3 },
        ));

        let request = next_message(&mut lines).await;
        assert_eq!(request["type"], "request");
        assert_eq!(request["action"], "moveItem");
        assert_eq!(request["payload"], json!({"fromSlot": 0, "toSlot": 3}));

        // The host moves the item and pushes the new slot contents.
        send(
            &mut host_out,
            json!({"type": "reply", "id": request["id"], "data": {"success": true}}),
        )
        .await;
        send(
            &mut host_out,
            json!({"type": "event", "action": "fw:inventory:refresh", "data": {
                "main": [{"slot": 3, "name": "water", "amount": 5, "weight": 0.5}],
                "maxWeight": 50
            }}),
        )
        .await;
        send(&mut host_out, json!({"type": "event", "action": "closeInventory"})).await;

        let focus = next_message(&mut lines).await;
        assert_eq!(focus["payload"]["hasFocus"], false);

        drop(host_out);
        assert!(lines.next_line().await.unwrap().is_none());
    };

    let (result, ()) = tokio::join!(runtime.run(BufReader::new(hud_in), hud_out), host);
    result.unwrap();

    let state = runtime.state();
    assert!(!state.panels.is_open("inventory"));
    assert!(state.stores.inventory.item_at(0).is_none());
    assert_eq!(state.stores.inventory.item_at(3).unwrap().amount, 5);
    assert!((state.stores.inventory.current_weight() - 2.5).abs() < 1e-9);
    assert!(state.stores.app.current_panel().is_none());

    let opened = lifecycle.try_recv().unwrap();
    assert_eq!(opened.name(), "inventory");
    let closed = lifecycle.try_recv().unwrap();
    assert_eq!(closed.name(), "inventory");
    assert!(lifecycle.try_recv().is_err());
}

#[tokio::test]
async fn test_host_error_reply_is_absorbed() {
    let (hud_in, mut host_out) = tokio::io::duplex(4 * 1024);
    let (host_in, hud_out) = tokio::io::duplex(4 * 1024);
    let mut runtime = HudRuntime::new(Config::default());

    let host = async move {
        let mut lines = BufReader::new(host_in).lines();
        send(&mut host_out, json!({"type": "event", "action": "openGarage"})).await;

        let request = next_message(&mut lines).await;
        assert_eq!(request["action"], "garage:getVehicles");
        let _focus = next_message(&mut lines).await;

        send(
            &mut host_out,
            json!({"type": "reply", "id": request["id"], "error": "garage unavailable"}),
        )
        .await;
        // A reply for an unknown id is only logged.
        send(&mut host_out, json!({"type": "reply", "id": 999, "data": {}})).await;
        send(&mut host_out, json!({"type": "event", "action": "closeGarage"})).await;
        let _focus = next_message(&mut lines).await;
        drop(host_out);
    };

    let (result, ()) = tokio::join!(runtime.run(BufReader::new(hud_in), hud_out), host);
    result.unwrap();

    let state = runtime.state();
    assert!(!state.panels.is_open("garage"));
    assert!(state.stores.garage.vehicles().is_empty());
}
