//! Go fixtures and helpers shared by tests.

use indoc::indoc;

use crate::program::Program;
use crate::{LineIndex, apply_edits, lint};

pub const PB_PATH: &str = "example.com/pb";
pub const APP_PATH: &str = "example.com/app";

/// Trimmed-down protoc-gen-go output for two messages.
pub const PB_SOURCE: &str = indoc! {r#"
    // Code generated by protoc-gen-go. DO NOT EDIT.
    // source: test.proto

    package pb

    import (
    	protoreflect "google.golang.org/protobuf/reflect/protoreflect"
    	protoimpl "google.golang.org/protobuf/runtime/protoimpl"
    )

    type Test struct {
    	state         protoimpl.MessageState
    	sizeCache     protoimpl.SizeCache
    	unknownFields protoimpl.UnknownFields

    	B        bool                 `protobuf:"varint,1,opt,name=b,proto3" json:"b,omitempty"`
    	D        float64              `protobuf:"fixed64,2,opt,name=d,proto3" json:"d,omitempty"`
    	F        float32              `protobuf:"fixed32,3,opt,name=f,proto3" json:"f,omitempty"`
    	I32      int32                `protobuf:"varint,4,opt,name=i32,proto3" json:"i32,omitempty"`
    	I64      int64                `protobuf:"varint,5,opt,name=i64,proto3" json:"i64,omitempty"`
    	S        string               `protobuf:"bytes,6,opt,name=s,proto3" json:"s,omitempty"`
    	U32      uint32               `protobuf:"varint,7,opt,name=u32,proto3" json:"u32,omitempty"`
    	U64      uint64               `protobuf:"varint,8,opt,name=u64,proto3" json:"u64,omitempty"`
    	Embedded *Embedded            `protobuf:"bytes,9,opt,name=embedded,proto3" json:"embedded,omitempty"`
    	Many     []*Embedded          `protobuf:"bytes,10,rep,name=many,proto3" json:"many,omitempty"`
    	Labels   map[string]*Embedded `protobuf:"bytes,11,rep,name=labels,proto3" json:"labels,omitempty"`
    }

    func (x *Test) Reset() {
    	*x = Test{}
    }

    func (x *Test) ProtoReflect() protoreflect.Message {
    	return nil
    }

    func (x *Test) GetB() bool {
    	if x != nil {
    		return x.B
    	}
    	return false
    }

    func (x *Test) GetD() float64 {
    	if x != nil {
    		return x.D
    	}
    	return 0
    }

    func (x *Test) GetF() float32 {
    	if x != nil {
    		return x.F
    	}
    	return 0
    }

    func (x *Test) GetI32() int32 {
    	if x != nil {
    		return x.I32
    	}
    	return 0
    }

    func (x *Test) GetI64() int64 {
    	if x != nil {
    		return x.I64
    	}
    	return 0
    }

    func (x *Test) GetS() string {
    	if x != nil {
    		return x.S
    	}
    	return ""
    }

    func (x *Test) GetU32() uint32 {
    	if x != nil {
    		return x.U32
    	}
    	return 0
    }

    func (x *Test) GetU64() uint64 {
    	if x != nil {
    		return x.U64
    	}
    	return 0
    }

    func (x *Test) GetEmbedded() *Embedded {
    	if x != nil {
    		return x.Embedded
    	}
    	return nil
    }

    func (x *Test) GetMany() []*Embedded {
    	if x != nil {
    		return x.Many
    	}
    	return nil
    }

    func (x *Test) GetLabels() map[string]*Embedded {
    	if x != nil {
    		return x.Labels
    	}
    	return nil
    }

    type Embedded struct {
    	state         protoimpl.MessageState
    	sizeCache     protoimpl.SizeCache
    	unknownFields protoimpl.UnknownFields

    	S        string    `protobuf:"bytes,1,opt,name=s,proto3" json:"s,omitempty"`
    	Embedded *Embedded `protobuf:"bytes,2,opt,name=embedded,proto3" json:"embedded,omitempty"`
    }

    func (x *Embedded) Reset() {
    	*x = Embedded{}
    }

    func (x *Embedded) GetS() string {
    	if x != nil {
    		return x.S
    	}
    	return ""
    }

    func (x *Embedded) GetEmbedded() *Embedded {
    	if x != nil {
    		return x.Embedded
    	}
    	return nil
    }
"#};

/// The message package plus one application file importing it.
pub fn program(app: &str) -> Program {
    let mut program = Program::new();
    program
        .add_file(PB_PATH, "pb/test.pb.go", PB_SOURCE)
        .expect("fixture parses");
    program
        .add_file(APP_PATH, "app/app.go", app)
        .expect("app parses");
    program
}

/// Findings in `app`, one `line:col: message` per line.
pub fn lint_app(app: &str) -> String {
    let program = program(app);
    let index = LineIndex::new(app);
    lint(&program)
        .iter()
        .flat_map(|report| report.diagnostics.iter())
        .map(|diag| {
            let pos = index.line_col(diag.range().start());
            format!("{}:{}: {}", pos.line, pos.col, diag.message())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `app` with every suggested fix applied.
pub fn fix_app(app: &str) -> String {
    let program = program(app);
    let edits = lint(&program)
        .iter()
        .flat_map(|report| report.diagnostics.edits())
        .collect();
    apply_edits(app, edits).text
}
