pub mod encode_sequence_use_case;
