use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docscan_parser::parse;
use docscan_scanner::{Scanner, TokenSource};

// A medium-size module (~90 lines) in the style the parser targets
const MODULE_SOURCE: &str = r#"
/**
 * A small widget module.
 */
dojo.provide("acme.widget.Panel");

dojo.require("dijit._Widget");
dojo.require("dijit._Templated");

(function () {
    var d = dojo, counter = 0;

    /**
     * Builds a unique id.
     * @param {String} prefix
     */
    function uniqueId(prefix) {
        counter += 1;
        return prefix + "_" + counter;
    }

    d.declare("acme.widget.Panel", [dijit._Widget, dijit._Templated], {
        // title: String
        //      Text shown in the header.
        title: "",

        templateString: "<div class='panel'><h2>${title}</h2></div>",

        postCreate: function () {
            this.inherited(arguments);
            this.id = uniqueId("panel");
            if (this.open) {
                this.show();
            } else {
                this.hide();
            }
        },

        show: function (/* Boolean? */ animate) {
            var node = this.domNode;
            d.style(node, "display", "block");
            for (var i = 0; i < this._listeners.length; i++) {
                this._listeners[i].call(this, "show");
            }
            return this;
        },

        hide: function () {
            d.style(this.domNode, "display", "none");
            return this;
        }
    });

    acme.widget.Panel.defaults = {
        title: "Untitled",
        open: false
    };

    acme.widget.Panel.create = function (params, node) {
        var panel = new acme.widget.Panel(params, node);
        panel.startup();
        return panel;
    };

    try {
        acme.widget.Panel.create({}, null);
    } catch (e) {
        console.log(e);
    }

    acme.widget.format = function (text, /* Object */ values) {
        return text.replace(/\$\{(\w+)\}/g, function (match, key) {
            return values[key] !== undefined ? values[key] : match;
        });
    };

    d.query(".panel")
        .addClass("ready")
        .forEach(function (node) {
            d.attr(node, "role", "region");
        });
})();
"#;

fn bench_scan(c: &mut Criterion) {
    c.bench_function("scan_module_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let mut scanner = Scanner::new(&arena, black_box(MODULE_SOURCE));
            let mut count = 0usize;
            while let Ok(token) = scanner.next_token() {
                if token.is_eof() {
                    break;
                }
                count += 1;
            }
            black_box(count);
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_module_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = parse(&arena, black_box(MODULE_SOURCE));
            black_box(program.map(|p| p.body.len()).unwrap_or(0));
        });
    });
}

criterion_group!(benches, bench_scan, bench_parse);
criterion_main!(benches);
