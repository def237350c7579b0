//! End-to-end properties over synthetic models: KV-cache equivalence,
//! determinism, quantized-path parity, and block-variant wiring.

mod common;

use common::{pseudo_weights, tiny_llama_builder, GgufBuilder, TinyDims};
use tinfer_engine::model::{EngineKind, Model};

fn forward_all(model: &Model, tokens: &[u32]) -> Vec<f32> {
    let mut st = model.new_state();
    for (i, &t) in tokens.iter().enumerate() {
        model.forward(&mut st, t, i);
    }
    st.logits.clone()
}

#[test]
fn loads_and_produces_finite_logits() {
    let (_dir, path) = tiny_llama_builder(&TinyDims::default()).write();
    let model = Model::load(&path, 32).unwrap();
    assert_eq!(model.engine_kind(), EngineKind::Standard);
    assert!(model.weights.output_tied);

    let logits = forward_all(&model, &[1, 4, 7]);
    assert_eq!(logits.len(), 12);
    assert!(logits.iter().all(|l| l.is_finite()));
    // Logits vary across the vocabulary.
    let min = logits.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(max > min);
}

#[test]
fn kv_cache_equivalence() {
    // Prefill P then decode one step == prefill P+1 from scratch.
    let (_dir, path) = tiny_llama_builder(&TinyDims::default()).write();
    let model = Model::load(&path, 32).unwrap();
    let tokens = [1u32, 4, 7, 9, 3, 5];

    // Incremental: prefix first, then the last token on the same state.
    let mut st = model.new_state();
    for (i, &t) in tokens[..5].iter().enumerate() {
        model.forward(&mut st, t, i);
    }
    model.forward(&mut st, tokens[5], 5);
    let incremental = st.logits.clone();

    let fresh = forward_all(&model, &tokens);
    let max_abs = incremental
        .iter()
        .zip(fresh.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_abs < 1e-3, "max abs diff {max_abs}");
}

#[test]
fn forward_is_deterministic() {
    let (_dir, path) = tiny_llama_builder(&TinyDims::default()).write();
    let model = Model::load(&path, 32).unwrap();
    let tokens = [1u32, 6, 2, 8];

    let a = forward_all(&model, &tokens);
    let b = forward_all(&model, &tokens);
    assert_eq!(a, b, "identical runs must be bit-identical");
}

#[test]
fn quantized_weights_track_f32_reference() {
    // Same model content stored as F32 and as Q8_0: logits must agree
    // within quantization noise.
    let d = TinyDims {
        dim: 32,
        n_layers: 1,
        n_heads: 2,
        n_kv_heads: 2,
        hidden: 32,
        vocab: 8,
        ctx: 16,
    };
    let head_dim = d.dim / d.n_heads;
    let kv_dim = d.n_kv_heads * head_dim;

    let build = |quantized: bool| {
        let mut b = GgufBuilder::new("llama");
        b.meta_u32("llama.embedding_length", d.dim as u32)
            .meta_u32("llama.block_count", 1)
            .meta_u32("llama.attention.head_count", d.n_heads as u32)
            .meta_u32("llama.attention.head_count_kv", d.n_kv_heads as u32)
            .meta_u32("llama.feed_forward_length", d.hidden as u32)
            .meta_u32("llama.vocab_size", d.vocab as u32)
            .meta_u32("llama.context_length", d.ctx as u32);

        b.tensor_f32(
            "token_embd.weight",
            &[d.dim as u64, d.vocab as u64],
            pseudo_weights(d.vocab * d.dim, 21),
        );
        b.tensor_f32("output_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);
        b.tensor_f32("blk.0.attn_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);
        b.tensor_f32("blk.0.ffn_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);

        let mats: [(&str, usize, usize, u32); 7] = [
            ("blk.0.attn_q.weight", d.dim, d.dim, 31),
            ("blk.0.attn_k.weight", kv_dim, d.dim, 32),
            ("blk.0.attn_v.weight", kv_dim, d.dim, 33),
            ("blk.0.attn_output.weight", d.dim, d.dim, 34),
            ("blk.0.ffn_gate.weight", d.hidden, d.dim, 35),
            ("blk.0.ffn_up.weight", d.hidden, d.dim, 36),
            ("blk.0.ffn_down.weight", d.dim, d.hidden, 37),
        ];
        for (name, rows, cols, seed) in mats {
            let data = pseudo_weights(rows * cols, seed);
            let dims = [cols as u64, rows as u64];
            if quantized {
                b.tensor_q8_0(name, &dims, data);
            } else {
                b.tensor_f32(name, &dims, data);
            }
        }
        b.write()
    };

    let (_d1, p1) = build(false);
    let (_d2, p2) = build(true);
    let reference = Model::load(&p1, 16).unwrap();
    let quantized = Model::load(&p2, 16).unwrap();

    let tokens = [1u32, 3, 5];
    let a = forward_all(&reference, &tokens);
    let b = forward_all(&quantized, &tokens);
    let scale = a.iter().map(|v| v.abs()).fold(0.0f32, f32::max).max(1.0);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() / scale < 5e-2, "f32={x} q8={y}");
    }
}

#[test]
fn parallel_ffn_consumes_pre_attention_norm() {
    // Command-R wiring: no ffn_norm, one shared pre-norm, outputs summed.
    // With the attention output projection zeroed, the result must equal
    // a sequential pre-norm model whose ffn_norm equals its attn_norm.
    let d = TinyDims {
        n_layers: 1,
        ..TinyDims::default()
    };
    let head_dim = d.dim / d.n_heads;
    let kv_dim = d.n_kv_heads * head_dim;

    let build = |parallel: bool| {
        let mut b = GgufBuilder::new("command-r");
        b.meta_u32("command-r.embedding_length", d.dim as u32)
            .meta_u32("command-r.block_count", 1)
            .meta_u32("command-r.attention.head_count", d.n_heads as u32)
            .meta_u32("command-r.attention.head_count_kv", d.n_kv_heads as u32)
            .meta_u32("command-r.feed_forward_length", d.hidden as u32)
            .meta_u32("command-r.vocab_size", d.vocab as u32)
            .meta_u32("command-r.context_length", d.ctx as u32);

        b.tensor_f32(
            "token_embd.weight",
            &[d.dim as u64, d.vocab as u64],
            pseudo_weights(d.vocab * d.dim, 41),
        );
        b.tensor_f32("output_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);
        b.tensor_f32("blk.0.attn_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);
        if !parallel {
            b.tensor_f32("blk.0.ffn_norm.weight", &[d.dim as u64], vec![1.0; d.dim]);
        }
        b.tensor_f32(
            "blk.0.attn_q.weight",
            &[d.dim as u64, d.dim as u64],
            pseudo_weights(d.dim * d.dim, 42),
        );
        b.tensor_f32(
            "blk.0.attn_k.weight",
            &[d.dim as u64, kv_dim as u64],
            pseudo_weights(kv_dim * d.dim, 43),
        );
        b.tensor_f32(
            "blk.0.attn_v.weight",
            &[d.dim as u64, kv_dim as u64],
            pseudo_weights(kv_dim * d.dim, 44),
        );
        // Zero output projection: attention contributes nothing to x.
        b.tensor_f32(
            "blk.0.attn_output.weight",
            &[d.dim as u64, d.dim as u64],
            vec![0.0; d.dim * d.dim],
        );
        b.tensor_f32(
            "blk.0.ffn_gate.weight",
            &[d.dim as u64, d.hidden as u64],
            pseudo_weights(d.hidden * d.dim, 45),
        );
        b.tensor_f32(
            "blk.0.ffn_up.weight",
            &[d.dim as u64, d.hidden as u64],
            pseudo_weights(d.hidden * d.dim, 46),
        );
        b.tensor_f32(
            "blk.0.ffn_down.weight",
            &[d.hidden as u64, d.dim as u64],
            pseudo_weights(d.dim * d.hidden, 47),
        );
        b.write()
    };

    let (_d1, p1) = build(true);
    let (_d2, p2) = build(false);
    let parallel = Model::load(&p1, 16).unwrap();
    let sequential = Model::load(&p2, 16).unwrap();

    let a = forward_all(&parallel, &[1, 5]);
    let b = forward_all(&sequential, &[1, 5]);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-4, "parallel={x} sequential={y}");
    }
}

#[test]
fn moe_model_runs_with_dense_prefix() {
    // One dense layer followed by one MoE layer (4 experts, top-2).
    let dim = 8usize;
    let hidden = 16usize;
    let experts = 4usize;
    let vocab = 10usize;

    let mut b = GgufBuilder::new("qwen3moe");
    b.meta_u32("qwen3moe.embedding_length", dim as u32)
        .meta_u32("qwen3moe.block_count", 2)
        .meta_u32("qwen3moe.attention.head_count", 2)
        .meta_u32("qwen3moe.attention.head_count_kv", 2)
        .meta_u32("qwen3moe.feed_forward_length", hidden as u32)
        .meta_u32("qwen3moe.vocab_size", vocab as u32)
        .meta_u32("qwen3moe.context_length", 16)
        .meta_u32("qwen3moe.expert_count", experts as u32)
        .meta_u32("qwen3moe.expert_used_count", 2)
        .meta_u32("qwen3moe.expert_feed_forward_length", hidden as u32)
        .meta_u32("qwen3moe.leading_dense_block_count", 1);

    b.tensor_f32(
        "token_embd.weight",
        &[dim as u64, vocab as u64],
        pseudo_weights(vocab * dim, 51),
    );
    b.tensor_f32("output_norm.weight", &[dim as u64], vec![1.0; dim]);

    for l in 0..2u64 {
        let name = |s: &str| format!("blk.{l}.{s}");
        let seed = 60 + l as u32 * 10;
        b.tensor_f32(&name("attn_norm.weight"), &[dim as u64], vec![1.0; dim]);
        b.tensor_f32(&name("ffn_norm.weight"), &[dim as u64], vec![1.0; dim]);
        for (i, w) in ["attn_q.weight", "attn_k.weight", "attn_v.weight", "attn_output.weight"]
            .iter()
            .enumerate()
        {
            b.tensor_f32(
                &name(w),
                &[dim as u64, dim as u64],
                pseudo_weights(dim * dim, seed + i as u32),
            );
        }
        if l == 0 {
            b.tensor_f32(
                &name("ffn_gate.weight"),
                &[dim as u64, hidden as u64],
                pseudo_weights(hidden * dim, seed + 5),
            );
            b.tensor_f32(
                &name("ffn_up.weight"),
                &[dim as u64, hidden as u64],
                pseudo_weights(hidden * dim, seed + 6),
            );
            b.tensor_f32(
                &name("ffn_down.weight"),
                &[hidden as u64, dim as u64],
                pseudo_weights(dim * hidden, seed + 7),
            );
        } else {
            b.tensor_f32(
                &name("ffn_gate_inp.weight"),
                &[dim as u64, experts as u64],
                pseudo_weights(experts * dim, seed + 8),
            );
            b.tensor_f32(
                &name("ffn_gate_exps.weight"),
                &[dim as u64, hidden as u64, experts as u64],
                pseudo_weights(experts * hidden * dim, seed + 9),
            );
            b.tensor_f32(
                &name("ffn_up_exps.weight"),
                &[dim as u64, hidden as u64, experts as u64],
                pseudo_weights(experts * hidden * dim, seed + 10),
            );
            b.tensor_f32(
                &name("ffn_down_exps.weight"),
                &[hidden as u64, dim as u64, experts as u64],
                pseudo_weights(experts * dim * hidden, seed + 11),
            );
        }
    }

    let (_dir, path) = b.write();
    let model = Model::load(&path, 16).unwrap();
    assert_eq!(model.engine_kind(), EngineKind::MoeHybrid);
    assert!(model.config.norm_topk_prob); // qwen3moe default

    let a = forward_all(&model, &[1, 3, 7]);
    assert!(a.iter().all(|l| l.is_finite()));
    let b2 = forward_all(&model, &[1, 3, 7]);
    assert_eq!(a, b2, "MoE forward must be deterministic");
}

#[test]
fn missing_tensor_reports_canonical_name() {
    // Claim two layers in metadata while providing tensors for one; the
    // loader must name the first missing blk.1 slot.
    let mut builder = tiny_llama_builder(&TinyDims {
        n_layers: 1,
        ..TinyDims::default()
    });
    builder.meta_u32("llama.block_count", 2); // overrides the earlier value
    let (_dir, path) = builder.write();
    match Model::load(&path, 16) {
        Err(tinfer_core::EngineError::MissingTensor(name)) => {
            assert!(name.starts_with("blk.1."), "unexpected slot {name}");
        }
        other => panic!("expected MissingTensor, got {:?}", other.map(|_| ())),
    }
}
