//! Integration tests for ABI sketch recovery.

#[cfg(test)]
mod integration_tests {
    use mimir_sketch::{sketch, AbiEntry, SketchArgs, SketchArgsBuilder};

    /// A hand-assembled contract: a two-entry dispatcher in front of a
    /// guarded and an unguarded destination.
    ///
    /// ```text
    /// 0x00  PUSH1 80 PUSH1 40 MSTORE
    /// 0x05  DUP1 PUSH4 2e64cec1 EQ PUSH1 1a JUMPI
    /// 0x0f  DUP1 PUSH4 6057361d EQ PUSH1 20 JUMPI
    /// 0x19  STOP
    /// 0x1a  JUMPDEST CALLVALUE DUP1 ISZERO PUSH1 00
    /// 0x20  JUMPDEST STOP
    /// ```
    fn dispatcher_bytecode() -> String {
        [
            "0x6080604052",
            "80632e64cec114601a57",
            "80636057361d14602057",
            "00",
            "5b348015",
            "6000",
            "5b00",
        ]
        .concat()
    }

    #[tokio::test]
    async fn test_sketch_nominal() {
        let abi = sketch(SketchArgs { target: dispatcher_bytecode(), strict: false })
            .await
            .expect("failed to sketch");

        assert_eq!(abi.len(), 2);
        match (&abi[0], &abi[1]) {
            (AbiEntry::Function(store), AbiEntry::Function(retrieve)) => {
                assert_eq!(store.selector, "0x2e64cec1");
                assert!(!store.payable);
                assert_eq!(retrieve.selector, "0x6057361d");
                assert!(retrieve.payable);
            }
            other => panic!("unexpected entries: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sketch_empty_targets() {
        for target in ["", "0x"] {
            let abi = sketch(SketchArgs { target: target.to_string(), strict: false })
                .await
                .expect("failed to sketch");
            assert!(abi.is_empty());
        }
    }

    #[tokio::test]
    async fn test_sketch_rejects_malformed_hex() {
        let result =
            sketch(SketchArgs { target: String::from("0xnothex"), strict: false }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_sketch_event_topic() {
        let topic = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        let abi = sketch(SketchArgs { target: format!("0x7f{topic}a1"), strict: false })
            .await
            .expect("failed to sketch");

        assert_eq!(abi, vec![AbiEntry::Event(mimir_sketch::EventEntry {
            hash: format!("0x{topic}"),
        })]);
    }

    #[tokio::test]
    async fn test_sketch_serialization_shape() {
        let abi = sketch(SketchArgs { target: dispatcher_bytecode(), strict: false })
            .await
            .expect("failed to sketch");

        let json = serde_json::to_value(&abi).expect("failed to serialize");
        assert_eq!(
            json,
            serde_json::json!([
                { "type": "function", "selector": "0x2e64cec1", "payable": false },
                { "type": "function", "selector": "0x6057361d", "payable": true },
            ])
        );
    }

    #[tokio::test]
    async fn test_sketch_from_file() {
        let file_path = "test_sketch_from_file";
        std::fs::write(file_path, dispatcher_bytecode()).expect("failed to write file");

        let args = SketchArgsBuilder::new()
            .target(String::from(file_path))
            .build()
            .expect("failed to build args");
        let abi = sketch(args).await.expect("failed to sketch");

        assert_eq!(abi.len(), 2);

        std::fs::remove_file(file_path).expect("failed to delete file");
    }

    #[tokio::test]
    async fn test_sketch_strict_mode() {
        // a dispatcher whose destination is never a JUMPDEST
        let args = SketchArgsBuilder::new()
            .target(String::from("0x80632e64cec11460375700"))
            .strict(true)
            .build()
            .expect("failed to build args");

        let abi = sketch(args).await.expect("failed to sketch");
        assert!(abi.is_empty());
    }
}
