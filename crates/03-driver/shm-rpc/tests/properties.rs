//! Property checks for sizing, padding and round trips.

use proptest::prelude::*;
use shm_rpc::{
    decode_procedure, decode_status, decode_values, decode_versions, AcceptStatus, MessageKind,
    Param, ParamKind, Procedure, RpcCodec, VersionRange, CALL_HEADER_LEN, REPLY_HEADER_LEN,
};

#[derive(Clone, Debug)]
enum OwnedParam {
    Sint(i32),
    Uint(u32),
    String(String),
    Blob(Vec<u8>),
}

impl OwnedParam {
    fn as_param(&self) -> Param<'_> {
        match self {
            OwnedParam::Sint(value) => Param::Sint(*value),
            OwnedParam::Uint(value) => Param::Uint(*value),
            OwnedParam::String(text) => Param::String(text),
            OwnedParam::Blob(bytes) => Param::Blob(bytes),
        }
    }
}

fn owned_param() -> impl Strategy<Value = OwnedParam> {
    prop_oneof![
        prop_oneof![Just(i32::MIN), Just(i32::MAX), any::<i32>()].prop_map(OwnedParam::Sint),
        prop_oneof![Just(0u32), Just(u32::MAX), any::<u32>()].prop_map(OwnedParam::Uint),
        prop::collection::vec(any::<char>(), 0..12)
            .prop_map(|chars| OwnedParam::String(chars.into_iter().collect())),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(OwnedParam::Blob),
    ]
}

fn procedure() -> impl Strategy<Value = Procedure> {
    (any::<u32>(), any::<u32>(), any::<u32>())
        .prop_map(|(program, version, procedure)| Procedure::new(program, version, procedure))
}

proptest! {
    #[test]
    fn request_round_trips(xid in any::<u32>(),
                           procedure in procedure(),
                           owned in prop::collection::vec(owned_param(), 0..8)) {
        let params: Vec<Param<'_>> = owned.iter().map(OwnedParam::as_param).collect();
        let codec = RpcCodec::default();
        let msg = codec.build_request(xid, procedure, &params).expect("build");

        prop_assert_eq!(msg.len(), codec.estimate_size(MessageKind::Call, &params).expect("size"));
        prop_assert_eq!(decode_procedure(msg.as_bytes()), Ok(procedure));

        let kinds: Vec<ParamKind> = params.iter().map(Param::kind).collect();
        let decoded = decode_values(msg.as_bytes(), MessageKind::Call, &kinds).expect("decode");
        prop_assert_eq!(decoded.as_slice(), params.as_slice());
    }

    #[test]
    fn success_reply_round_trips(xid in any::<u32>(),
                                 owned in prop::collection::vec(owned_param(), 0..8)) {
        let params: Vec<Param<'_>> = owned.iter().map(OwnedParam::as_param).collect();
        let codec = RpcCodec::default();
        let expected = codec.estimate_size(MessageKind::Reply, &params).expect("size");
        let mut buf = vec![0u8; expected];
        let written = codec
            .encode_response(xid, AcceptStatus::Success, &params, &mut buf)
            .expect("encode");
        prop_assert_eq!(written, expected);
        prop_assert_eq!(decode_status(&buf), Ok(AcceptStatus::Success));

        let kinds: Vec<ParamKind> = params.iter().map(Param::kind).collect();
        let decoded = decode_values(&buf, MessageKind::Reply, &kinds).expect("decode");
        prop_assert_eq!(decoded.as_slice(), params.as_slice());
    }

    #[test]
    fn exact_buffer_is_enough_and_one_less_is_not(owned in prop::collection::vec(owned_param(), 0..8)) {
        let params: Vec<Param<'_>> = owned.iter().map(OwnedParam::as_param).collect();
        let codec = RpcCodec::default();
        let size = codec.estimate_size(MessageKind::Call, &params).expect("size");
        let mut exact = vec![0u8; size];
        prop_assert_eq!(
            codec.encode_request(0, Procedure::new(1, 1, 1), &params, &mut exact),
            Ok(size)
        );
        let mut short = vec![0u8; size - 1];
        prop_assert!(codec
            .encode_request(0, Procedure::new(1, 1, 1), &params, &mut short)
            .is_err());
    }

    #[test]
    fn variable_items_follow_padding_law(payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = RpcCodec::default();
        let n = payload.len();
        let mut buf = vec![0xFFu8; CALL_HEADER_LEN + 4 + n + 3];
        let written = codec
            .encode_request(0, Procedure::new(1, 1, 1), &[Param::Blob(&payload)], &mut buf)
            .expect("encode");
        let field = &buf[CALL_HEADER_LEN..written];
        prop_assert_eq!(field.len(), 4 + n + (4 - n % 4) % 4);
        prop_assert_eq!(&field[..4], &(n as u32).to_be_bytes()[..]);
        prop_assert_eq!(&field[4..4 + n], payload.as_slice());
        prop_assert!(field[4 + n..].iter().all(|&b| b == 0));
    }

    #[test]
    fn version_range_round_trips(xid in any::<u32>(), min in any::<u32>(), max in any::<u32>()) {
        let codec = RpcCodec::default();
        let mut buf = [0u8; REPLY_HEADER_LEN + 8];
        let written = codec
            .encode_prog_mismatch(xid, VersionRange::new(min, max), &mut buf)
            .expect("encode");
        prop_assert_eq!(written, buf.len());
        prop_assert_eq!(decode_versions(&buf), Ok(VersionRange::new(min, max)));
    }
}
