//! Encode/decode round trips through caller buffers and allocated messages.

use shm_rpc::{
    decode_args, decode_procedure, decode_status, decode_values, decode_versions, message_kind,
    transaction_id, AcceptStatus, CodecConfig, MessageKind, Param, ParamKind, ParamOut,
    Procedure, RpcCodec, RpcError, VersionRange, CALL_HEADER_LEN, REPLY_HEADER_LEN,
};

const NFS_READ: Procedure = Procedure::new(100003, 3, 1);

#[test]
fn reference_request_layout_and_decode() {
    let codec = RpcCodec::default();
    let params = [Param::Uint(5), Param::String("ab")];
    let msg = codec.build_request(0, NFS_READ, &params).expect("build");

    let bytes = msg.as_bytes();
    assert_eq!(
        &bytes[CALL_HEADER_LEN..],
        &[0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x02, 0x61, 0x62, 0x00, 0x00]
    );

    assert_eq!(decode_procedure(bytes), Ok(NFS_READ));
    let (mut value, mut text) = (0u32, "");
    decode_args(
        bytes,
        MessageKind::Call,
        &mut [ParamOut::Uint(&mut value), ParamOut::String(&mut text)],
    )
    .expect("decode");
    assert_eq!((value, text), (5, "ab"));
}

#[test]
fn request_round_trip_preserves_every_kind() {
    let codec = RpcCodec::default();
    let blob = [0u8, 1, 2, 3, 4, 5, 6];
    let params = [
        Param::Sint(i32::MIN),
        Param::Sint(i32::MAX),
        Param::Uint(u32::MAX),
        Param::Uint(0),
        Param::String(""),
        Param::String("modem ready"),
        Param::Blob(&[]),
        Param::Blob(&blob),
    ];
    let procedure = Procedure::new(0x2000_0001, 7, 42);
    let msg = codec.build_request(0x1234, procedure, &params).expect("build");

    assert_eq!(
        msg.len(),
        codec.estimate_size(MessageKind::Call, &params).expect("size")
    );
    assert_eq!(message_kind(msg.as_bytes()), Ok(MessageKind::Call));
    assert_eq!(transaction_id(msg.as_bytes()), Ok(0x1234));
    assert_eq!(decode_procedure(msg.as_bytes()), Ok(procedure));

    let kinds: Vec<ParamKind> = params.iter().map(Param::kind).collect();
    let decoded = decode_values(msg.as_bytes(), MessageKind::Call, &kinds).expect("decode");
    assert_eq!(decoded.as_slice(), &params[..]);
}

#[test]
fn success_reply_round_trip() {
    let codec = RpcCodec::default();
    let params = [Param::Sint(-3), Param::Blob(b"\x01\x02\x03\x04")];
    let mut buf = vec![0u8; 128];
    let written = codec
        .encode_response(77, AcceptStatus::Success, &params, &mut buf)
        .expect("encode");
    assert_eq!(written, REPLY_HEADER_LEN + 4 + 8);
    let msg = &buf[..written];

    assert_eq!(message_kind(msg), Ok(MessageKind::Reply));
    assert_eq!(transaction_id(msg), Ok(77));
    assert_eq!(decode_status(msg), Ok(AcceptStatus::Success));

    let (mut code, mut data) = (0i32, &[][..]);
    decode_args(
        msg,
        MessageKind::Reply,
        &mut [ParamOut::Sint(&mut code), ParamOut::Blob(&mut data)],
    )
    .expect("decode");
    assert_eq!(code, -3);
    assert_eq!(data, b"\x01\x02\x03\x04");
}

#[test]
fn prog_mismatch_round_trip() {
    let codec = RpcCodec::default();
    let msg = codec
        .build_response(
            5,
            AcceptStatus::ProgMismatch,
            &[Param::Uint(2), Param::Uint(4)],
        )
        .expect("build");
    assert_eq!(msg.len(), REPLY_HEADER_LEN + 8);
    assert_eq!(decode_status(msg.as_bytes()), Ok(AcceptStatus::ProgMismatch));
    assert_eq!(decode_versions(msg.as_bytes()), Ok(VersionRange::new(2, 4)));
}

#[test]
fn prog_mismatch_rejects_other_shapes() {
    let codec = RpcCodec::default();
    let mut buf = [0u8; 64];
    let shapes: [&[Param<'_>]; 4] = [
        &[],
        &[Param::Uint(1)],
        &[Param::Uint(1), Param::Uint(2), Param::Uint(3)],
        &[Param::String("1"), Param::Uint(2)],
    ];
    for params in shapes {
        let result = codec.encode_response(1, AcceptStatus::ProgMismatch, params, &mut buf);
        assert!(
            matches!(
                result,
                Err(RpcError::ParameterCountMismatch { .. })
                    | Err(RpcError::ParameterKindMismatch { .. })
            ),
            "shape {params:?} accepted: {result:?}"
        );
    }
}

#[test]
fn every_failure_status_decodes_without_body() {
    let codec = RpcCodec::default();
    for status in [
        AcceptStatus::ProgUnavail,
        AcceptStatus::ProcUnavail,
        AcceptStatus::GarbageArgs,
        AcceptStatus::SystemErr,
    ] {
        let msg = codec.build_response(9, status, &[]).expect("build");
        assert_eq!(msg.len(), REPLY_HEADER_LEN);
        assert_eq!(decode_status(msg.as_bytes()), Ok(status));
        assert_eq!(
            decode_versions(msg.as_bytes()),
            Err(RpcError::InvalidStatusForOperation { status })
        );
    }
}

#[test]
fn configured_limit_caps_builds() {
    let codec = RpcCodec::new(CodecConfig::with_max_message_len(64)).expect("config");
    let small = [0u8; 8];
    let large = [0u8; 32];
    assert!(codec
        .build_request(1, NFS_READ, &[Param::Blob(&small)])
        .is_ok());
    assert_eq!(
        codec
            .build_request(1, NFS_READ, &[Param::Blob(&large)])
            .map(|msg| msg.len()),
        Err(RpcError::SizeOverflow { limit: 64 })
    );
}

#[test]
fn invalid_config_is_refused() {
    assert!(matches!(
        RpcCodec::new(CodecConfig::with_max_message_len(8)),
        Err(RpcError::InvalidConfig(_))
    ));
}
